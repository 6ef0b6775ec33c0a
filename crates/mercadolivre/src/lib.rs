//! Cliente da API de categorias do Mercado Livre
//!
//! Este crate cobre apenas a parte da API usada pelo painel de suporte:
//!
//! - **Categorias do site**: `/sites/{site_id}/categories` (lista de raízes)
//! - **Detalhe de categoria**: `/categories/{category_id}` (nó + filhos imediatos)
//!
//! Os endpoints de categorias são públicos; o `access_token` é opcional e só é
//! enviado quando configurado.
//!
//! # Exemplo Básico
//!
//! ```rust,ignore
//! use mercadolivre::MercadoLivreClient;
//!
//! #[tokio::main]
//! async fn main() -> mercadolivre::Result<()> {
//!     let client = MercadoLivreClient::new("https://api.mercadolibre.com", "MLB")?;
//!
//!     let raizes = client.list_site_categories().await?;
//!     let detalhe = client.get_category(&raizes[0].id).await?;
//!     println!("{} tem {} filhos", detalhe.name, detalhe.children_categories.len());
//!
//!     Ok(())
//! }
//! ```

pub mod categories;
pub mod client;
pub mod error;

pub use categories::{CategoryDetail, ChildCategory, PathEntry, SiteCategory};
pub use client::MercadoLivreClient;
pub use error::{MercadoLivreError, Result};
