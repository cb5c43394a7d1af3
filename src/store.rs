use crate::error::Error;
use crate::models::{self, Notice, NoticeDraft};
use crate::storage::KvStore;

pub const NOTICES_KEY: &str = "hjnj_app_data";

pub struct NoticeStore {
    notices: Vec<Notice>,
}

impl NoticeStore {
    /// Loads the persisted collection, falling back to the seed set when
    /// nothing has been stored yet. Seeding does not write; the seed only
    /// reaches disk once the first mutation persists it. A document that
    /// exists but fails to parse is corruption and fails the load.
    pub fn load<S: KvStore>(kv: &S, now: i64) -> Result<Self, Error> {
        let notices = match kv.get(NOTICES_KEY)? {
            Some(raw) => {
                serde_json::from_str(&raw).map_err(|source| Error::PersistenceCorrupt {
                    key: NOTICES_KEY,
                    source,
                })?
            }
            None => models::seed_notices(now),
        };
        Ok(Self { notices })
    }

    /// Overwrites whatever is stored with a fresh seed set. This is the
    /// recovery path for a corrupt collection document.
    pub fn reseed<S: KvStore>(kv: &S, now: i64) -> Result<Self, Error> {
        let store = Self {
            notices: models::seed_notices(now),
        };
        store.persist(kv)?;
        Ok(store)
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn get(&self, id: &str) -> Option<&Notice> {
        self.notices.iter().find(|n| n.id == id)
    }

    /// Prepends a new notice so the newest creation stays first even when
    /// two creations land on the same millisecond, then persists the whole
    /// collection.
    pub fn create<S: KvStore>(
        &mut self,
        kv: &S,
        draft: NoticeDraft,
        author: &str,
    ) -> Result<Notice, Error> {
        if draft.title.trim().is_empty() {
            return Err(Error::EmptyTitle);
        }
        let notice = Notice {
            id: models::fresh_id(),
            title: draft.title,
            content: draft.content,
            category: draft.category,
            created_at: models::now_millis(),
            author: author.to_string(),
        };
        self.notices.insert(0, notice.clone());
        self.persist(kv)?;
        Ok(notice)
    }

    /// Removes by id. An absent id is a no-op, not an error; the collection
    /// is persisted either way so every mutation performs exactly one write,
    /// including the write that records a now-empty collection.
    pub fn delete<S: KvStore>(&mut self, kv: &S, id: &str) -> Result<bool, Error> {
        let before = self.notices.len();
        self.notices.retain(|n| n.id != id);
        let removed = self.notices.len() != before;
        self.persist(kv)?;
        Ok(removed)
    }

    fn persist<S: KvStore>(&self, kv: &S) -> Result<(), Error> {
        let raw = serde_json::to_string(&self.notices).map_err(Error::Serialize)?;
        kv.set(NOTICES_KEY, &raw)
    }
}
