// Application layer: wiring shared by the command-line entry points.

pub mod runner;
