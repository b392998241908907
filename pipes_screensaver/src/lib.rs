// pipes_screensaver: terminal front end for the pipes simulation.
//
// The simulation crate never draws; this crate turns its event stream into
// something a person (or another program) can read.
//
// Module overview:
// - `cli.rs`:   Command-line parsing into `CliArgs`, and merging those
//               arguments over a loaded `PipesConfig`.
// - `sink.rs`:  `RenderSink` implementations: a human-readable text log and
//               a JSON-lines stream, both over any `io::Write`.
//
// The binary (`main.rs`) wires these to `pipes_sim::driver`.

pub mod cli;
pub mod sink;
