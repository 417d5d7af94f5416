pub mod product;
pub mod product_tag;
pub mod purchase;
pub mod review;
pub mod tag;
pub mod user;
