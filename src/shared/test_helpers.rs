#[cfg(test)]
use std::sync::atomic::{AtomicUsize, Ordering};
#[cfg(test)]
use std::sync::Mutex;

#[cfg(test)]
use async_trait::async_trait;
#[cfg(test)]
use chrono::{DateTime, Duration, Utc};

#[cfg(test)]
use crate::core::error::{AppError, Result};
#[cfg(test)]
use crate::features::report_threads::clients::ThreadSource;
#[cfg(test)]
use crate::features::report_threads::dtos::CreateReplyRequest;
#[cfg(test)]
use crate::features::report_threads::models::{Reply, Report};

#[cfg(test)]
pub fn ts(value: &str) -> DateTime<Utc> {
    value.parse().expect("valid RFC 3339 timestamp")
}

#[cfg(test)]
pub fn sample_report() -> Report {
    Report {
        id: 1,
        subject: "Test Report".to_string(),
        details: "Report details".to_string(),
        report_type: "general".to_string(),
        requested_at: ts("2023-01-01T00:00:00Z"),
        from_student_username: "student1".to_string(),
        top_level_replies: Vec::new(),
    }
}

#[cfg(test)]
pub fn reply(
    id: i64,
    author: &str,
    is_admin: bool,
    created_at: &str,
    children: Vec<Reply>,
) -> Reply {
    Reply {
        id,
        content: format!("reply {}", id),
        created_at: ts(created_at),
        replied_by_username: author.to_string(),
        is_admin_reply: is_admin,
        child_replies: children,
    }
}

/// Scripted outcome of one `ThreadSource::read` call.
#[cfg(test)]
#[derive(Clone)]
pub enum StubRead {
    Ok(Report),
    Forbidden,
    ServerError(&'static str),
    Network,
}

/// Outcome of every `ThreadSource::write` call on a stub.
#[cfg(test)]
#[derive(Clone)]
pub enum StubWrite {
    Ok,
    Rejected(Option<&'static str>),
    Network,
}

/// `ThreadSource` stub with scripted outcomes and call counters.
///
/// Reads consume the script front-first; the last entry repeats once the
/// script is exhausted, so a single-entry script behaves like a fixed
/// response.
#[cfg(test)]
pub struct StubThreadSource {
    name: &'static str,
    reads: Mutex<Vec<StubRead>>,
    write: StubWrite,
    pub read_calls: AtomicUsize,
    pub write_calls: AtomicUsize,
}

#[cfg(test)]
impl StubThreadSource {
    pub fn new(name: &'static str, reads: Vec<StubRead>, write: StubWrite) -> Self {
        assert!(!reads.is_empty(), "read script must not be empty");
        Self {
            name,
            reads: Mutex::new(reads),
            write,
            read_calls: AtomicUsize::new(0),
            write_calls: AtomicUsize::new(0),
        }
    }

    pub fn reading(name: &'static str, read: StubRead) -> Self {
        Self::new(name, vec![read], StubWrite::Ok)
    }

    fn next_read(&self) -> StubRead {
        let mut script = self.reads.lock().unwrap();
        if script.len() > 1 {
            script.remove(0)
        } else {
            script[0].clone()
        }
    }
}

#[cfg(test)]
#[async_trait]
impl ThreadSource for StubThreadSource {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn read(&self, _report_id: i64) -> Result<Report> {
        self.read_calls.fetch_add(1, Ordering::SeqCst);
        match self.next_read() {
            StubRead::Ok(report) => Ok(report),
            StubRead::Forbidden => Err(AppError::Api {
                status: 403,
                message: None,
            }),
            StubRead::ServerError(message) => Err(AppError::Api {
                status: 500,
                message: Some(message.to_string()),
            }),
            StubRead::Network => Err(AppError::Transport("connection refused".to_string())),
        }
    }

    async fn write(&self, _reply: &CreateReplyRequest) -> Result<()> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        match &self.write {
            StubWrite::Ok => Ok(()),
            StubWrite::Rejected(message) => Err(AppError::Api {
                status: 400,
                message: message.map(str::to_string),
            }),
            StubWrite::Network => Err(AppError::Transport("connection refused".to_string())),
        }
    }
}

/// Stateful in-memory thread: writes append to the stored report, reads
/// return the current snapshot. Used to exercise the full
/// submit-then-refresh cycle without a server.
#[cfg(test)]
pub struct FakeThreadBackend {
    name: &'static str,
    report: Mutex<Report>,
    /// Authorship recorded on appended replies.
    admin_author: bool,
}

#[cfg(test)]
impl FakeThreadBackend {
    pub fn new(name: &'static str, report: Report, admin_author: bool) -> Self {
        Self {
            name,
            report: Mutex::new(report),
            admin_author,
        }
    }

    fn find_reply<'a>(replies: &'a mut [Reply], id: i64) -> Option<&'a mut Reply> {
        for reply in replies {
            if reply.id == id {
                return Some(reply);
            }
            if let Some(found) = Self::find_reply(&mut reply.child_replies, id) {
                return Some(found);
            }
        }
        None
    }
}

#[cfg(test)]
#[async_trait]
impl ThreadSource for FakeThreadBackend {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn read(&self, _report_id: i64) -> Result<Report> {
        Ok(self.report.lock().unwrap().clone())
    }

    async fn write(&self, request: &CreateReplyRequest) -> Result<()> {
        let mut report = self.report.lock().unwrap();
        let sequence = 1 + report.reply_count() as i64;
        let new_reply = Reply {
            id: 100 + sequence,
            content: request.content.clone(),
            created_at: report.requested_at + Duration::days(sequence),
            replied_by_username: if self.admin_author {
                "admin1".to_string()
            } else {
                "student1".to_string()
            },
            is_admin_reply: self.admin_author,
            child_replies: Vec::new(),
        };

        match request.parent_reply {
            None => report.top_level_replies.push(new_reply),
            Some(parent_id) => {
                let parent = Self::find_reply(&mut report.top_level_replies, parent_id)
                    .ok_or_else(|| AppError::Api {
                        status: 404,
                        message: Some(format!("Reply {} not found", parent_id)),
                    })?;
                parent.child_replies.push(new_reply);
            }
        }

        Ok(())
    }
}
