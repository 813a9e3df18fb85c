pub mod answers;
pub mod data;
pub mod encode;
pub mod forest;
pub mod model;
pub mod pipeline;
pub mod recommend;
pub mod synthesis;
