// Downloads services
// Stateless helpers: command delivery, filesystem access, settings, view-item grouping.

pub mod command_channel;
pub mod file_system;
pub mod settings_engine;
pub mod view_item_mapper;
