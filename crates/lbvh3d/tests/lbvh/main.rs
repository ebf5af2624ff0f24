mod common;
mod concurrent_queries;
mod nearest;
mod overlap;
