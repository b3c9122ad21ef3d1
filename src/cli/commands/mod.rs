mod detail;
mod genres;
mod init;
mod list;

pub use detail::cmd_movie_detail;
pub use genres::cmd_list_genres;
pub use init::cmd_init;
pub use list::{ListOptions, cmd_list_movies};
