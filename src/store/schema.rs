pub const SCHEMA: &str = r#"
-- Past exam papers; branches live in paper_branches
CREATE TABLE IF NOT EXISTS exam_papers (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    filename TEXT NOT NULL,
    regulation TEXT NOT NULL,
    year TEXT NOT NULL,
    semester TEXT NOT NULL,
    paper_type TEXT NOT NULL,          -- lower-cased: regular | supplementary

    -- Payload: base64 text, optionally of a zlib stream
    filedata TEXT NOT NULL,
    compressed INTEGER NOT NULL DEFAULT 0,
    size_bytes INTEGER NOT NULL DEFAULT 0,  -- original (uncompressed) size
    checksum TEXT NOT NULL DEFAULT '',      -- sha-256 of the original bytes
    uploaded_at TEXT DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);

-- Many-to-many relationship between exam papers and branches
CREATE TABLE IF NOT EXISTS paper_branches (
    paper_id INTEGER NOT NULL REFERENCES exam_papers(id) ON DELETE CASCADE,
    branch TEXT NOT NULL,
    PRIMARY KEY (paper_id, branch)
);

CREATE TABLE IF NOT EXISTS subject_notes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    filename TEXT NOT NULL,
    subject TEXT NOT NULL,
    regulation TEXT NOT NULL,
    year TEXT NOT NULL,
    filedata TEXT NOT NULL,
    compressed INTEGER NOT NULL DEFAULT 0,
    size_bytes INTEGER NOT NULL DEFAULT 0,
    checksum TEXT NOT NULL DEFAULT '',
    uploaded_at TEXT DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);

CREATE TABLE IF NOT EXISTS assignments (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    filename TEXT NOT NULL,
    branch TEXT NOT NULL,
    year TEXT NOT NULL,
    semester TEXT NOT NULL,
    subject TEXT NOT NULL,
    unit TEXT NOT NULL,
    filedata TEXT NOT NULL,
    compressed INTEGER NOT NULL DEFAULT 0,
    size_bytes INTEGER NOT NULL DEFAULT 0,
    checksum TEXT NOT NULL DEFAULT '',
    uploaded_at TEXT DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);

-- Announcements link out to externally hosted forms and expire
CREATE TABLE IF NOT EXISTS aptitude_tests (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    year TEXT NOT NULL,
    title TEXT NOT NULL,
    description TEXT NOT NULL,
    topics TEXT NOT NULL,              -- comma-joined
    duration TEXT NOT NULL,
    total_questions INTEGER NOT NULL,
    form_link TEXT NOT NULL,
    uploaded_at TEXT NOT NULL,
    expire_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS weekly_quizzes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    year TEXT NOT NULL,
    semester TEXT NOT NULL,
    branch TEXT NOT NULL,
    title TEXT NOT NULL,
    description TEXT NOT NULL,
    topics TEXT NOT NULL,
    duration TEXT NOT NULL,
    total_questions INTEGER NOT NULL,
    form_link TEXT NOT NULL,
    uploaded_at TEXT NOT NULL,
    expire_at TEXT NOT NULL
);

-- One row per served download (kind is papers | notes | assignments)
CREATE TABLE IF NOT EXISTS downloads (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    kind TEXT NOT NULL,
    document_id INTEGER NOT NULL,
    downloaded_at TEXT NOT NULL
);

-- The single shared admin identity
CREATE TABLE IF NOT EXISTS admin_credentials (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    username TEXT NOT NULL,
    password_hash TEXT NOT NULL,       -- argon2id hash with embedded salt
    created_at TEXT NOT NULL
);

-- Create indexes
CREATE INDEX IF NOT EXISTS idx_exam_papers_filter ON exam_papers(regulation, year, semester, paper_type);
CREATE INDEX IF NOT EXISTS idx_paper_branches_branch ON paper_branches(branch);
CREATE INDEX IF NOT EXISTS idx_subject_notes_filter ON subject_notes(regulation, year);
CREATE INDEX IF NOT EXISTS idx_assignments_filter ON assignments(branch, year, semester);
CREATE INDEX IF NOT EXISTS idx_aptitude_tests_expire ON aptitude_tests(expire_at);
CREATE INDEX IF NOT EXISTS idx_weekly_quizzes_expire ON weekly_quizzes(expire_at);
CREATE INDEX IF NOT EXISTS idx_downloads_time ON downloads(downloaded_at);
"#;
