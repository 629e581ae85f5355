pub mod factory;
pub mod google;
pub mod interface;

pub use factory::TranslateFactory;
pub use google::GoogleTranslateClient;
pub use interface::{TranslateInterface, TranslateRequest, Translation};
