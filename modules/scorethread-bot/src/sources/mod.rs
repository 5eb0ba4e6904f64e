pub mod cricapi;
pub mod cricbuzz;

pub use cricapi::CricApiSource;
pub use cricbuzz::CricbuzzSource;
