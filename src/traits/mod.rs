pub mod mailer;
pub mod notify;
pub mod random;
pub mod time;

pub use mailer::{Mailer, MailerError, TracingMailer};
pub use notify::{NoticeKind, Notifier, TracingNotifier};
pub use random::{OsRandom, RandomSource};
pub use time::{SystemTime, TimeProvider};
