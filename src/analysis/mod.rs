pub mod abilities;
pub mod buckets;
pub mod draft;
pub mod hero_pool;
pub mod items;
pub mod matchups;
pub mod patterns;
