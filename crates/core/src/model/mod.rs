mod game_record;
mod movie;
mod question;
mod statistics;
mod view;

pub use game_record::GameRecord;
pub use movie::{Movie, MovieError};
pub use question::{Answer, QuizQuestion};
pub use statistics::StatisticsSnapshot;
pub use view::{QuizResults, QuizStep};
