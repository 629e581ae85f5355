pub mod state;
pub mod store;
pub mod view;

pub use state::WidgetState;
pub use store::{TranslateOutcome, WidgetStore};
pub use view::WidgetView;
