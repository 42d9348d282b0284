mod app;
mod settings;

pub use app::Application;
pub use settings::controller_settings;
