// Module exports for CLI subcommands.
//
// Each module handles one group of subcommands; main.rs only parses
// arguments and dispatches.

pub mod distance;
pub mod polyline;
