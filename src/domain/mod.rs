pub mod review;
pub mod run;
