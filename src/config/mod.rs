pub mod settings;

pub use settings::{MercadoLivreSettings, ServerSettings, Settings, TreeSettings};
