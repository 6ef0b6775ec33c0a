use arvore::{FanOutLimits, CHILD_FAN_OUT, ROOT_FAN_OUT};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub mercadolivre: MercadoLivreSettings,
    pub arvore: TreeSettings,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MercadoLivreSettings {
    pub base_url: String,
    pub site_id: String,
    pub access_token: Option<String>,  // Opcional: endpoints de categorias são públicos
    pub timeout_seconds: u64,
    pub connect_timeout_seconds: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TreeSettings {
    pub root_fan_out: usize,   // Raízes percorridas pelo "expandir tudo"
    pub child_fan_out: usize,  // Filhos percorridos por nó no "expandir tudo"
    pub default_root_id: Option<String>,  // Raiz usada quando a visão não informa uma
    pub idle_ttl_minutes: u32,  // Visão sem acesso por mais tempo que isso é desmontada
}

impl TreeSettings {
    pub fn limits(&self) -> FanOutLimits {
        FanOutLimits {
            roots: self.root_fan_out,
            children: self.child_fan_out,
        }
    }

    pub fn idle_ttl(&self) -> chrono::Duration {
        chrono::Duration::minutes(i64::from(self.idle_ttl_minutes))
    }
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let mut builder = Self::builder_with_defaults()?
            // Arquivo de configuração base
            .add_source(File::with_name("config/default").required(false))
            // Arquivo específico do ambiente
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false));

        // Adicionar variáveis de ambiente específicas
        if let Ok(token) = std::env::var("ML_ACCESS_TOKEN") {
            builder = builder.set_override("mercadolivre.access_token", token)?;
        }
        if let Ok(site_id) = std::env::var("ML_SITE_ID") {
            builder = builder.set_override("mercadolivre.site_id", site_id)?;
        }

        // PAINEL_SUPORTE__SERVER__PORT=8081, PAINEL_SUPORTE__ARVORE__CHILD_FAN_OUT=20, ...
        builder = builder.add_source(Environment::with_prefix("PAINEL_SUPORTE").separator("__"));

        let s = builder.build()?;

        s.try_deserialize()
    }

    /// Só os valores padrão, sem arquivos nem ambiente
    pub fn defaults() -> Result<Self, ConfigError> {
        Self::builder_with_defaults()?.build()?.try_deserialize()
    }

    fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("mercadolivre.base_url", mercadolivre::client::DEFAULT_BASE_URL)?
            .set_default("mercadolivre.site_id", mercadolivre::client::DEFAULT_SITE_ID)?
            .set_default("mercadolivre.timeout_seconds", 30)?
            .set_default("mercadolivre.connect_timeout_seconds", 5)?
            .set_default("arvore.root_fan_out", ROOT_FAN_OUT as u64)?
            .set_default("arvore.child_fan_out", CHILD_FAN_OUT as u64)?
            .set_default("arvore.idle_ttl_minutes", 30)
    }
}
