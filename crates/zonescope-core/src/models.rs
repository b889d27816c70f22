pub mod catalog;
pub mod feature;
pub mod value;

pub use catalog::FieldCatalog;
pub use feature::{Feature, PropertyBag};
pub use value::PropertyValue;
