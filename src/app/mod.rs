mod report;

mod schedule_commands;
pub(crate) use schedule_commands::ExportCommand;
pub(crate) use schedule_commands::SolveCommand;
