// Data types shared by the detector, the adapters and the installers.

// Result and command types produced by the shell executor and adapters.
pub mod command;
// Host platform descriptor.
pub mod platform;
// Optional user configuration (`config.yaml`).
pub mod settings;
