mod args;
mod command;
mod keyword_cmd;
mod link_cmd;
mod relation_cmd;

pub use args::Cli;
pub use command::Command;
pub use keyword_cmd::KeywordCmd;
pub use link_cmd::LinkCmd;
pub use relation_cmd::RelationCmd;

pub use args::parse;
