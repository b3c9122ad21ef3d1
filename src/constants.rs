pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong";

pub mod tmdb {

    pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3/";

    pub const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

    pub const DEFAULT_LANGUAGE: &str = "en-US";

    pub const USER_AGENT: &str = "Marquee/1.0";

    pub const API_KEY_ENV: &str = "TMDB_API_KEY";
}

pub mod aggregation {

    /// Trending pages requested per aggregation, independent of the requested count.
    pub const TRENDING_PAGE_COUNT: u32 = 5;

    pub const DEFAULT_TOP_N: usize = 100;
}

pub mod routes {

    /// Navigation argument carrying the movie id of a detail view.
    pub const MOVIE_ID_ARG: &str = "movieId";
}
