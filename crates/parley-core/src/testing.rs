//! In-memory repository mocks shared by the service tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, NaiveDate, Utc};
use parley_types::error::RepositoryError;
use parley_types::session::{Message, Session};
use parley_types::stats::{CounterKind, DailyCounter};

use crate::repository::session::SessionRepository;
use crate::repository::stats::StatisticsRepository;

#[derive(Default)]
pub struct MemorySessions {
    sessions: Mutex<Vec<Session>>,
    fail_writes: AtomicBool,
}

impl MemorySessions {
    pub fn with_session(self, id: &str, messages: Vec<Message>) -> Self {
        let mut session = Session::new(messages);
        session.id = id.to_string();
        self.sessions.lock().unwrap().push(session);
        self
    }

    pub fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }

    fn check_writable(&self) -> Result<(), RepositoryError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            Err(RepositoryError::Connection)
        } else {
            Ok(())
        }
    }
}

impl SessionRepository for MemorySessions {
    async fn get(&self, id: &str) -> Result<Option<Session>, RepositoryError> {
        let sessions = self.sessions.lock().unwrap();
        Ok(sessions.iter().find(|s| s.id == id).cloned())
    }

    async fn list(&self) -> Result<Vec<Session>, RepositoryError> {
        Ok(self.sessions.lock().unwrap().clone())
    }

    async fn create(&self, session: &Session) -> Result<Session, RepositoryError> {
        self.check_writable()?;
        let mut sessions = self.sessions.lock().unwrap();
        if sessions.iter().any(|s| s.id == session.id) {
            return Err(RepositoryError::Conflict(format!(
                "session {} already exists",
                session.id
            )));
        }
        sessions.push(session.clone());
        Ok(session.clone())
    }

    async fn replace_messages(
        &self,
        id: &str,
        messages: &[Message],
    ) -> Result<Option<Session>, RepositoryError> {
        self.check_writable()?;
        let mut sessions = self.sessions.lock().unwrap();
        Ok(sessions.iter_mut().find(|s| s.id == id).map(|s| {
            s.messages = messages.to_vec();
            s.updated_at = Utc::now();
            s.clone()
        }))
    }

    async fn delete(&self, id: &str) -> Result<Option<DateTime<Utc>>, RepositoryError> {
        self.check_writable()?;
        let mut sessions = self.sessions.lock().unwrap();
        let before = sessions.len();
        sessions.retain(|s| s.id != id);
        Ok((sessions.len() < before).then(Utc::now))
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        Ok(self.sessions.lock().unwrap().len() as u64)
    }
}

#[derive(Default)]
pub struct MemoryStats {
    counters: Mutex<Vec<DailyCounter>>,
    fail_writes: AtomicBool,
}

impl MemoryStats {
    pub fn with_counter(self, date: &str, saved: u64, deleted: u64) -> Self {
        self.counters.lock().unwrap().push(DailyCounter {
            date: date.parse().unwrap(),
            saved_sessions: saved,
            deleted_sessions: deleted,
        });
        self
    }

    pub fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }
}

impl StatisticsRepository for MemoryStats {
    async fn increment(
        &self,
        date: NaiveDate,
        kind: CounterKind,
        create_missing: bool,
    ) -> Result<Option<DailyCounter>, RepositoryError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(RepositoryError::Connection);
        }
        let mut counters = self.counters.lock().unwrap();
        let idx = match counters.iter().position(|c| c.date == date) {
            Some(idx) => idx,
            None if create_missing => {
                counters.push(DailyCounter::zero(date));
                counters.len() - 1
            }
            None => return Ok(None),
        };
        let counter = &mut counters[idx];
        match kind {
            CounterKind::Saved => counter.saved_sessions += 1,
            CounterKind::Deleted => counter.deleted_sessions += 1,
        }
        Ok(Some(counter.clone()))
    }

    async fn get(&self, date: NaiveDate) -> Result<Option<DailyCounter>, RepositoryError> {
        let counters = self.counters.lock().unwrap();
        Ok(counters.iter().find(|c| c.date == date).cloned())
    }

    async fn list(&self) -> Result<Vec<DailyCounter>, RepositoryError> {
        Ok(self.counters.lock().unwrap().clone())
    }

    async fn seed(&self, date: NaiveDate) -> Result<DailyCounter, RepositoryError> {
        let mut counters = self.counters.lock().unwrap();
        if let Some(existing) = counters.iter().find(|c| c.date == date) {
            return Ok(existing.clone());
        }
        let counter = DailyCounter::zero(date);
        counters.push(counter.clone());
        Ok(counter)
    }
}

pub fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}
