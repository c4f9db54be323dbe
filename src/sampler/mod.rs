//! Relevance-ranked snippet sampler.
//!
//! Turns a free-text prompt and a list of candidate roots into a short,
//! ordered list of file excerpts the model can use as grounding context:
//! 1. Extract the prompt's keyword set
//! 2. Resolve each candidate root, skipping the ones that do not exist
//! 3. Discover documentation and source files under each root
//! 4. Read, trim and truncate every file, skipping unreadable ones
//! 5. Score each excerpt by keyword density
//! 6. Return the best `limit` scored excerpts, or zero-score fallbacks when nothing matched

mod discovery;
mod keywords;
mod resolve;

use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use serde::Serialize;

pub use discovery::{discover_files, FileClasses};
pub use keywords::{extract_keywords, score};
pub use resolve::{agent_root, canonical_key, contain_relative, find_project_root, PathResolver};

/// Upper bound on the characters kept from a single file.
pub const MAX_SNIPPET_CHARS: usize = 1200;

/// Bytes read from one file; the excerpt only ever needs the head.
pub const MAX_READ_BYTES: u64 = 64 * 1024;

/// Scored entries collected per unit of `limit` before discovery stops.
const SCORED_POOL_FACTOR: usize = 4;

/// Small slice of a repository file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileSnippet {
    /// Display path, relative to the project root when possible
    pub path: String,
    /// Trimmed excerpt without carriage returns
    pub content: String,
    /// Keyword density; `0.0` means no keyword matched
    pub relevance: f64,
}

/// Why a discovered file produced no snippet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The file could not be opened or read
    Io,
    /// The file is not valid UTF-8
    Decode,
}

/// Outcome of reading one candidate file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileRead {
    Loaded(String),
    Skipped(SkipReason),
}

impl FileRead {
    /// Read the head of `path` and reduce it to snippet form.
    ///
    /// At most [`MAX_READ_BYTES`] are read. A multi-byte character cut at
    /// that boundary is dropped; invalid UTF-8 before it skips the file.
    pub fn from_path(path: &Path) -> Self {
        match read_head(path) {
            Ok(text) => Self::Loaded(to_snippet_text(&text)),
            Err(e) if e.kind() == io::ErrorKind::InvalidData => Self::Skipped(SkipReason::Decode),
            Err(_) => Self::Skipped(SkipReason::Io),
        }
    }
}

fn read_head(path: &Path) -> io::Result<String> {
    let mut bytes = Vec::new();
    File::open(path)?
        .take(MAX_READ_BYTES)
        .read_to_end(&mut bytes)?;

    match String::from_utf8(bytes) {
        Ok(text) => Ok(text),
        Err(e) => {
            let utf8 = e.utf8_error();
            // error_len() is None only for a sequence cut off at the end
            if utf8.error_len().is_some() || (e.as_bytes().len() as u64) < MAX_READ_BYTES {
                return Err(io::Error::new(io::ErrorKind::InvalidData, utf8));
            }
            let mut bytes = e.into_bytes();
            bytes.truncate(utf8.valid_up_to());
            String::from_utf8(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
        }
    }
}

/// A discovered file that was left out of the sample.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: SkipReason,
}

/// Everything one sampling pass produced.
#[derive(Debug, Clone, Default)]
pub struct SampleReport {
    pub snippets: Vec<FileSnippet>,
    pub skipped: Vec<SkippedFile>,
    pub unresolved_roots: Vec<String>,
}

/// Trim, drop carriage returns, keep the first [`MAX_SNIPPET_CHARS`] characters.
pub fn to_snippet_text(text: &str) -> String {
    text.trim()
        .replace('\r', "")
        .chars()
        .take(MAX_SNIPPET_CHARS)
        .collect()
}

/// Samples repository files for prompt-relevant snippets.
#[derive(Debug, Clone)]
pub struct SnippetSampler {
    resolver: PathResolver,
    classes: FileClasses,
}

impl SnippetSampler {
    pub fn new(resolver: PathResolver, classes: FileClasses) -> Self {
        Self { resolver, classes }
    }

    pub fn resolver(&self) -> &PathResolver {
        &self.resolver
    }

    /// Return up to `limit` snippets ranked by keyword overlap with `prompt`.
    pub fn sample<S: AsRef<str>>(&self, prompt: &str, roots: &[S], limit: usize) -> Vec<FileSnippet> {
        self.sample_with_report(prompt, roots, limit).snippets
    }

    /// Like [`sample`](Self::sample), also reporting skipped files and unresolved roots.
    pub fn sample_with_report<S: AsRef<str>>(
        &self,
        prompt: &str,
        roots: &[S],
        limit: usize,
    ) -> SampleReport {
        let keywords = extract_keywords(prompt);
        let scored_cap = limit.saturating_mul(SCORED_POOL_FACTOR);

        let mut scored: Vec<FileSnippet> = Vec::new();
        let mut fallback: Vec<FileSnippet> = Vec::new();
        let mut skipped: Vec<SkippedFile> = Vec::new();
        let mut unresolved_roots: Vec<String> = Vec::new();

        for raw in roots {
            let raw = raw.as_ref();
            let Some(location) = self.resolver.resolve(raw) else {
                tracing::debug!(root = raw, "Candidate root not found, skipping");
                unresolved_roots.push(raw.to_string());
                continue;
            };
            let location = canonical_key(&location).unwrap_or(location);

            for file in discover_files(&location, &self.classes) {
                if scored.len() >= scored_cap {
                    break;
                }

                let content = match FileRead::from_path(&file) {
                    FileRead::Loaded(content) => content,
                    FileRead::Skipped(reason) => {
                        tracing::debug!(path = %file.display(), ?reason, "Skipping unreadable file");
                        skipped.push(SkippedFile { path: file, reason });
                        continue;
                    }
                };

                let relevance = score(&content, &keywords);
                if relevance == 0.0 {
                    if fallback.len() < limit {
                        fallback.push(FileSnippet {
                            path: self.resolver.display_path(&file),
                            content,
                            relevance: 0.0,
                        });
                    }
                    continue;
                }

                scored.push(FileSnippet {
                    path: self.resolver.display_path(&file),
                    content,
                    relevance,
                });
            }
        }

        let snippets = if scored.is_empty() {
            fallback.truncate(limit);
            fallback
        } else {
            // Stable: ties keep discovery order.
            scored.sort_by(|a, b| b.relevance.total_cmp(&a.relevance));
            scored.truncate(limit);
            scored
        };

        tracing::debug!(
            sampled = snippets.len(),
            skipped = skipped.len(),
            "Sampled repository files"
        );

        SampleReport {
            snippets,
            skipped,
            unresolved_roots,
        }
    }
}

/// Render snippets as one context block for the model.
pub fn snippets_to_context(snippets: &[FileSnippet]) -> String {
    snippets
        .iter()
        .map(|snippet| format!("SOURCE: {}\nCONTENT:\n{}\n---", snippet.path, snippet.content))
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const ONBOARDING_DOC: &str = "# Idea backlog\n\n\
        ## Onboarding improvements\n\
        New users drop off during onboarding because the setup guide is long.\n\
        Shorter onboarding checklists could lift activation.\n\n\
        ## Billing\n\
        Invoices are generated manually every month.\n";

    struct Fixture {
        dir: TempDir,
        sampler: SnippetSampler,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = TempDir::new().unwrap();
            let resolver = PathResolver::new(dir.path().to_path_buf(), dir.path().join("agent"))
                .with_cwd(dir.path().to_path_buf());
            let sampler = SnippetSampler::new(resolver, FileClasses::default());
            Self { dir, sampler }
        }

        fn write(&self, relative: &str, contents: impl AsRef<[u8]>) -> PathBuf {
            let path = self.dir.path().join(relative);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(&path, contents).unwrap();
            path
        }

        fn root(&self) -> String {
            self.dir.path().to_string_lossy().into_owned()
        }
    }

    #[test]
    fn single_file_root_is_limited_and_relevant() {
        let fx = Fixture::new();
        let target = fx.write("notes.md", ONBOARDING_DOC);

        let snippets = fx.sampler.sample(
            "onboarding improvements",
            &[target.to_string_lossy().into_owned()],
            2,
        );
        assert!(snippets.len() <= 2);
        assert!(snippets.iter().any(|s| s.content.to_lowercase().contains("onboarding")));
        assert_eq!(snippets[0].path, "notes.md");
    }

    #[test]
    fn output_never_exceeds_limit() {
        let fx = Fixture::new();
        for i in 0..12 {
            fx.write(&format!("docs/note{i:02}.md"), "caching strategy notes");
        }
        for limit in 1..=5 {
            let snippets = fx.sampler.sample("caching strategy", &[fx.root()], limit);
            assert_eq!(snippets.len(), limit);
        }
    }

    #[test]
    fn scored_results_are_sorted_and_never_mixed() {
        let fx = Fixture::new();
        fx.write("a.md", "cache");
        fx.write("b.md", "a long document that mentions cache only once in passing");
        fx.write("c.md", "nothing relevant here");

        let snippets = fx.sampler.sample("cache", &[fx.root()], 5);
        assert_eq!(snippets.len(), 2);
        assert!(snippets.iter().all(|s| s.relevance > 0.0));
        assert_eq!(snippets[0].path, "a.md");
        assert!(snippets[0].relevance >= snippets[1].relevance);
    }

    #[test]
    fn ties_keep_discovery_order() {
        let fx = Fixture::new();
        fx.write("b.md", "redis");
        fx.write("a.md", "redis");
        fx.write("c.py", "redis");

        let snippets = fx.sampler.sample("redis", &[fx.root()], 3);
        let paths: Vec<_> = snippets.iter().map(|s| s.path.as_str()).collect();
        assert_eq!(paths, vec!["a.md", "b.md", "c.py"]);
    }

    #[test]
    fn blank_prompt_yields_only_fallback() {
        let fx = Fixture::new();
        for i in 0..4 {
            fx.write(&format!("n{i}.md"), "some content");
        }

        let snippets = fx.sampler.sample("   ", &[fx.root()], 3);
        assert_eq!(snippets.len(), 3);
        assert!(snippets.iter().all(|s| s.relevance == 0.0));
    }

    #[test]
    fn fallback_is_capped_at_limit() {
        let fx = Fixture::new();
        for i in 0..10 {
            fx.write(&format!("zero{i}.md"), "unrelated words");
        }

        let report = fx.sampler.sample_with_report("kubernetes", &[fx.root()], 2);
        assert_eq!(report.snippets.len(), 2);
        assert!(report.snippets.iter().all(|s| s.relevance == 0.0));
    }

    #[test]
    fn content_is_truncated_trimmed_and_stripped() {
        let fx = Fixture::new();
        let body = format!("\n\n  plan\r\n{}  \n", "x".repeat(5000));
        fx.write("big.md", body);

        let snippets = fx.sampler.sample("plan", &[fx.root()], 1);
        let content = &snippets[0].content;
        assert_eq!(content.chars().count(), MAX_SNIPPET_CHARS);
        assert!(content.starts_with("plan\n"));
        assert!(!content.contains('\r'));
    }

    #[test]
    fn unreadable_files_are_skipped_and_reported() {
        let fx = Fixture::new();
        fx.write("good.md", "deploy pipeline");
        fx.write("bad.md", [0xff_u8, 0xfe, 0x00, 0x9f]);

        let report = fx.sampler.sample_with_report("deploy", &[fx.root()], 5);
        assert_eq!(report.snippets.len(), 1);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].reason, SkipReason::Decode);
    }

    #[test]
    fn large_files_are_read_only_up_to_the_head() {
        let fx = Fixture::new();
        let mut body = b"pipeline ".to_vec();
        body.extend(std::iter::repeat(b'y').take(MAX_READ_BYTES as usize * 3));
        // Invalid bytes past the read window never get decoded.
        body.extend([0xff_u8, 0xfe]);
        fx.write("huge.md", body);

        let report = fx.sampler.sample_with_report("pipeline", &[fx.root()], 1);
        assert!(report.skipped.is_empty());
        assert_eq!(report.snippets[0].content.chars().count(), MAX_SNIPPET_CHARS);
        assert!(report.snippets[0].content.starts_with("pipeline y"));
    }

    #[test]
    fn character_cut_at_read_window_is_dropped() {
        let fx = Fixture::new();
        let mut body = b"pipeline".to_vec();
        body.extend(std::iter::repeat(b' ').take(MAX_READ_BYTES as usize - body.len() - 1));
        body.extend("é tail".as_bytes());
        let path = fx.write("edge.md", body);

        assert_eq!(FileRead::from_path(&path), FileRead::Loaded("pipeline".to_string()));
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_files_are_sampled_under_their_link_path() {
        let fx = Fixture::new();
        let outside = TempDir::new().unwrap();
        fs::write(outside.path().join("real.md"), "caching strategy").unwrap();
        fs::create_dir_all(fx.dir.path().join("docs")).unwrap();
        std::os::unix::fs::symlink(outside.path().join("real.md"), fx.dir.path().join("docs/link.md"))
            .unwrap();

        let snippets = fx.sampler.sample("caching", &[fx.root()], 3);
        assert_eq!(snippets.len(), 1);
        assert_eq!(snippets[0].path, "docs/link.md");
        assert_eq!(snippets[0].content, "caching strategy");
    }

    #[test]
    fn missing_roots_are_skipped_silently() {
        let fx = Fixture::new();
        fx.write("docs/a.md", "release checklist");

        let roots = vec!["does-not-exist-anywhere".to_string(), "docs".to_string()];
        let report = fx.sampler.sample_with_report("release", &roots, 3);
        assert_eq!(report.snippets.len(), 1);
        assert_eq!(report.unresolved_roots, vec!["does-not-exist-anywhere"]);
    }

    #[test]
    fn empty_roots_give_empty_result() {
        let fx = Fixture::new();
        let roots: Vec<String> = Vec::new();
        assert!(fx.sampler.sample("anything", &roots, 3).is_empty());
    }

    #[test]
    fn scored_pool_stops_at_four_times_limit() {
        let fx = Fixture::new();
        // Later files are shorter, so they would score higher if they were reached.
        for i in 0..20 {
            fx.write(&format!("m{i:02}.md"), format!("metric {}", "x".repeat(100 - i * 4)));
        }
        // Only the first 4 discovered files are scored with limit 1.
        let snippets = fx.sampler.sample("metric", &[fx.root()], 1);
        assert_eq!(snippets.len(), 1);
        assert_eq!(snippets[0].path, "m03.md");
    }

    #[test]
    fn sampling_is_deterministic() {
        let fx = Fixture::new();
        fx.write("x/one.md", "search ranking");
        fx.write("x/two.py", "ranking = search()");
        fx.write("y/three.md", "search");

        let first = fx.sampler.sample("search ranking", &[fx.root()], 3);
        let second = fx.sampler.sample("search ranking", &[fx.root()], 3);
        assert_eq!(first, second);
    }

    #[test]
    fn context_rendering_matches_record_format() {
        let snippets = vec![
            FileSnippet {
                path: "a.md".to_string(),
                content: "alpha".to_string(),
                relevance: 0.5,
            },
            FileSnippet {
                path: "b.py".to_string(),
                content: "beta".to_string(),
                relevance: 0.2,
            },
        ];
        assert_eq!(
            snippets_to_context(&snippets),
            "SOURCE: a.md\nCONTENT:\nalpha\n---\n\nSOURCE: b.py\nCONTENT:\nbeta\n---"
        );
        assert_eq!(snippets_to_context(&[]), "");
    }
}
