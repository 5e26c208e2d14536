pub use super::skin::Entity as Skin;
