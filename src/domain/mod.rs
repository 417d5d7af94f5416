pub mod admin;
pub mod cart;
pub mod catalog;
pub mod product;
pub mod purchase;
pub mod review;
pub mod seller;
pub mod session;
pub mod user;
