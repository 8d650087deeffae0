// Scoring stages, in pipeline order: recruiter → analyst → hr → recommender.
// Each stage takes the previous stage's record by value and returns the next
// record type; none of them does IO.

pub mod analyst;
pub mod hr;
pub mod recommender;
pub mod recruiter;
