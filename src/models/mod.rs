mod item;
mod price;
mod supplier;
mod token;

pub use item::{Item, ItemFields, ItemPatch};
pub use price::{Price, PriceError};
pub use supplier::{Supplier, SupplierFields, SupplierPatch};
pub use token::{ApiToken, ApiUser};
