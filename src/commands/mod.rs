pub mod batch;
pub mod doctor;
pub mod interactive;
pub mod launch;
pub mod publish;
pub mod simulate;

mod report;
