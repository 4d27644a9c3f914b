pub mod args;
pub mod stdin;

pub use args::ArgsSource;
pub use stdin::StdinSource;
