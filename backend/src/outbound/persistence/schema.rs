//! Diesel table definitions.
//!
//! Keep in sync with `backend/migrations`.

diesel::table! {
    /// Entries of every collection, discriminated by `collection`.
    ///
    /// `seq` is a database-assigned sequence giving stable insertion order.
    journal_entries (id) {
        /// Primary key: UUID v4 assigned by the application.
        id -> Uuid,
        /// Monotonic insertion sequence.
        seq -> Int8,
        /// Collection discriminator (`forms` or `journal`).
        collection -> Varchar,
        /// Entry title.
        title -> Text,
        /// Date string as submitted.
        entry_date -> Text,
        /// Free text.
        content -> Text,
        /// Optional mood tag.
        mood -> Nullable<Text>,
        /// Server-assigned creation time.
        created_at -> Timestamptz,
    }
}
