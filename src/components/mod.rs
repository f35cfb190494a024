//! Maud HTML template components for the web UI.
//!
//! - `layout`: Base page layout and per-site navigation
//! - `button`: Button and link-button components
//! - `alert`: Alerts and form-level error messages
//! - `card`: Post cards, post and topic lists
//! - `form`: Form elements with field error rendering
//! - `table`: Table components
//!
//! # Example
//!
//! ```ignore
//! use maud::{html, Markup};
//! use crate::components::{Alert, BaseLayout, Input, Site};
//!
//! fn my_page() -> Markup {
//!     let content = html! {
//!         h1 { "Hello World" }
//!         (Alert::error("Something went wrong"))
//!         (Input::text("title").placeholder("Title"))
//!     };
//!     BaseLayout::new("My Page", Site::Forum).render(content)
//! }
//! ```

pub mod alert;
pub mod button;
pub mod card;
pub mod form;
pub mod layout;
pub mod table;

pub use layout::{BaseLayout, Site};

pub use button::{Button, ButtonVariant};

pub use alert::{Alert, FormAlerts};

pub use card::{comment_count_label, EmptyState, PostCard, PostList, TopicList};

pub use form::{FieldErrors, Form, FormGroup, Input, TextArea};

pub use table::{Table, TableRow};
