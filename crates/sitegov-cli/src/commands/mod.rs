pub mod audit;
pub mod classify;
pub mod decide;
pub mod hub_canonical;
pub mod sitemap_build;
pub mod sitemap_validate;
