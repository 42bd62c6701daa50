pub mod bio;
pub mod client;
pub mod decision;
pub mod dispatch;
pub mod pipeline;
pub mod reconcile;
pub mod report;
pub mod similarity;
