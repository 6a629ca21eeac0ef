//! Command dispatch for the shell

use std::fmt;

use lrusim::{Access, CacheStats, LruCache};
use serde::Serialize;
use tracing::debug;

use crate::command::Command;
use crate::history::{History, Operation};

pub const HELP: &str = "\
Commands (case-insensitive):
     READ <value> or R <value>   - read a value from the cache
     WRITE <value> or W <value>  - write a value to the cache
     RESET [capacity]            - empty the cache, optionally resizing it
     SHOW or S                   - list cached values, LRU first
     STATS                       - hit/miss counters
     HISTORY or H                - operation log, newest first
     DUMP                        - JSON snapshot of the session
     EXIT or E                   - exit the program";

/// Result of one command, rendered with `Display`
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Access(Access),
    Contents { keys: Vec<String>, capacity: usize },
    Stats(CacheStats),
    Reset { capacity: usize },
    History(Vec<String>),
    Dump(String),
    Help,
    Exit,
    Rejected(String),
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Access(access) => write!(f, "{}", access),
            Reply::Contents { keys, capacity } => {
                if keys.is_empty() {
                    write!(f, "EMPTY (0 / {})", capacity)
                } else {
                    write!(f, "{} ({} / {})", keys.join(" -> "), keys.len(), capacity)
                }
            }
            Reply::Stats(stats) => write!(
                f,
                "HITS: {}  MISSES: {}  EVICTIONS: {}  HIT RATE: {:.1}%",
                stats.hits(),
                stats.misses(),
                stats.evictions(),
                stats.hit_ratio() * 100.0
            ),
            Reply::Reset { capacity } => write!(f, "OK (capacity {})", capacity),
            Reply::History(lines) => {
                if lines.is_empty() {
                    f.write_str("(no operations)")
                } else {
                    f.write_str(&lines.join("\n"))
                }
            }
            Reply::Dump(json) => f.write_str(json),
            Reply::Help => f.write_str(HELP),
            Reply::Exit => f.write_str("BYE"),
            Reply::Rejected(msg) => f.write_str(msg),
        }
    }
}

/// JSON view of a session for `DUMP`
#[derive(Serialize)]
struct Snapshot<'a> {
    capacity: usize,
    contents: Vec<&'a str>,
    stats: CacheStats,
    history: &'a History,
}

/// A cache plus its operation log
pub struct Session {
    cache: LruCache<String>,
    history: History,
}

impl Session {
    pub fn new(capacity: usize, history_limit: usize) -> lrusim::Result<Self> {
        Ok(Self {
            cache: LruCache::new(capacity)?,
            history: History::new(history_limit),
        })
    }

    pub fn cache(&self) -> &LruCache<String> {
        &self.cache
    }

    /// Apply one command and describe the outcome; never performs I/O
    pub fn handle(&mut self, cmd: Command) -> Reply {
        match cmd {
            Command::Read(key) => self.handle_read(key),
            Command::Write(key) => self.handle_write(key),
            Command::Reset(capacity) => self.handle_reset(capacity),
            Command::Show => self.handle_show(),
            Command::Stats => Reply::Stats(self.cache.stats()),
            Command::History => self.handle_history(),
            Command::Dump => self.handle_dump(),
            Command::Help => Reply::Help,
            Command::Exit => Reply::Exit,
        }
    }

    fn handle_read(&mut self, key: String) -> Reply {
        let access = self.cache.read(key.as_str());
        self.history.record(Operation::Read, &key, access);
        Reply::Access(access)
    }

    fn handle_write(&mut self, key: String) -> Reply {
        let access = self.cache.write(key.clone());
        self.history.record(Operation::Write, &key, access);
        Reply::Access(access)
    }

    fn handle_reset(&mut self, capacity: Option<usize>) -> Reply {
        match capacity {
            Some(n) => {
                if let Err(e) = self.cache.reset_with_capacity(n) {
                    return Reply::Rejected(format!("ERR {}", e));
                }
            }
            None => self.cache.reset(),
        }
        if !self.history.is_empty() {
            debug!(dropped = self.history.len(), "history cleared");
            self.history.clear();
        }
        debug!(capacity = self.cache.capacity(), "session reset");
        Reply::Reset {
            capacity: self.cache.capacity(),
        }
    }

    fn handle_show(&self) -> Reply {
        Reply::Contents {
            keys: self.cache.contents().cloned().collect(),
            capacity: self.cache.capacity(),
        }
    }

    fn handle_history(&self) -> Reply {
        Reply::History(self.history.iter().map(|r| r.to_string()).collect())
    }

    fn handle_dump(&self) -> Reply {
        let snapshot = Snapshot {
            capacity: self.cache.capacity(),
            contents: self.cache.contents().map(String::as_str).collect(),
            stats: self.cache.stats(),
            history: &self.history,
        };

        match serde_json::to_string_pretty(&snapshot) {
            Ok(json) => Reply::Dump(json),
            Err(e) => Reply::Rejected(format!("ERR {}", e)),
        }
    }
}
