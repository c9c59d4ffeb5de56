// Translation module: prompt building and model output parsing
// Author: kelexine (https://github.com/kelexine)

pub mod prompt;
pub mod response;

pub use prompt::build_prompt;
pub use response::parse_generation;
