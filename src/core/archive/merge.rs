// ─── Jar Merger ───
// Unions library jars into the client jar, first contributor wins.

use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use zip::result::ZipError;
use zip::{ZipArchive, ZipWriter};

use crate::core::error::{BundlerError, BundlerResult};

/// Why a source archive was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceIssue {
    /// The file is missing or cannot be opened.
    Unavailable,
    /// The file is not a valid zip, or one of its entries cannot be read.
    Corrupt,
}

/// A source that was skipped (entirely or after a partial copy).
#[derive(Debug, Clone)]
pub struct SourceWarning {
    pub source: PathBuf,
    pub issue: SourceIssue,
    pub detail: String,
}

/// Outcome of a merge that reached the end.
#[derive(Debug, Clone, Default)]
pub struct MergeReport {
    /// Unique paths present in the target after the merge.
    pub total_entries: usize,
    /// Entries copied in from sources.
    pub added_entries: usize,
    /// Source entries dropped because the path was already present.
    pub skipped_duplicates: usize,
    pub warnings: Vec<SourceWarning>,
}

/// Merge `sources` into `target` in place.
///
/// Entries already in `target` are never replaced. Sources are applied in
/// the given order, so an earlier source wins a path collision over a later
/// one. A missing or corrupt source is recorded in
/// [`MergeReport::warnings`] and skipped. Only a target that cannot be
/// opened, or a failed write to it, aborts the merge.
///
/// `target` is created as an empty archive when it does not exist.
pub fn merge_into_jar(target: &Path, sources: &[PathBuf]) -> BundlerResult<MergeReport> {
    info!(
        "Merging {} jars into existing file: {:?}",
        sources.len(),
        target
    );

    let mut seen = existing_entry_names(target)?;
    info!(
        "Target jar already contains {} files, skipping duplicates",
        seen.len()
    );

    let mut writer = open_target_writer(target)?;
    let mut report = MergeReport::default();

    for source in sources {
        match copy_new_entries(&mut writer, source, &mut seen, &mut report) {
            Ok(()) => {}
            Err(SourceFailure::Skip(warning)) => {
                warn!(
                    "Skipping malformed or missing jar {:?}: {}",
                    warning.source, warning.detail
                );
                report.warnings.push(warning);
            }
            Err(SourceFailure::Target(source_err)) => {
                // `writer` is dropped here, which writes the central directory
                // for everything copied so far.
                return Err(BundlerError::Zip(source_err));
            }
        }
    }

    writer.finish()?;

    report.total_entries = seen.len();
    info!(
        "Finished merging. Total unique files in {:?}: {} ({} added, {} duplicates skipped, {} warnings)",
        target,
        report.total_entries,
        report.added_entries,
        report.skipped_duplicates,
        report.warnings.len()
    );
    Ok(report)
}

enum SourceFailure {
    /// Recoverable: this source is skipped.
    Skip(SourceWarning),
    /// Fatal: writing to the target failed.
    Target(ZipError),
}

fn existing_entry_names(target: &Path) -> BundlerResult<HashSet<String>> {
    let file = match File::open(target) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(HashSet::new()),
        Err(e) => return Err(target_unavailable(target, ZipError::Io(e))),
    };

    let archive = ZipArchive::new(file).map_err(|e| target_unavailable(target, e))?;
    let names = archive.file_names().map(str::to_owned).collect();
    Ok(names)
}

fn open_target_writer(target: &Path) -> BundlerResult<ZipWriter<File>> {
    if !target.exists() {
        let file = File::create(target).map_err(|e| target_unavailable(target, ZipError::Io(e)))?;
        return Ok(ZipWriter::new(file));
    }

    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .open(target)
        .map_err(|e| target_unavailable(target, ZipError::Io(e)))?;
    ZipWriter::new_append(file).map_err(|e| target_unavailable(target, e))
}

fn target_unavailable(target: &Path, source: ZipError) -> BundlerError {
    BundlerError::TargetUnavailable {
        path: target.to_path_buf(),
        source,
    }
}

fn copy_new_entries(
    writer: &mut ZipWriter<File>,
    source: &Path,
    seen: &mut HashSet<String>,
    report: &mut MergeReport,
) -> Result<(), SourceFailure> {
    let skip = |issue: SourceIssue, detail: String| {
        SourceFailure::Skip(SourceWarning {
            source: source.to_path_buf(),
            issue,
            detail,
        })
    };

    let file = File::open(source).map_err(|e| skip(SourceIssue::Unavailable, e.to_string()))?;
    let mut archive =
        ZipArchive::new(file).map_err(|e| skip(SourceIssue::Corrupt, e.to_string()))?;

    let mut added = 0usize;
    for index in 0..archive.len() {
        let name = {
            let mut entry = archive
                .by_index(index)
                .map_err(|e| skip(SourceIssue::Corrupt, e.to_string()))?;
            let name = entry.name().to_owned();
            if seen.contains(&name) {
                report.skipped_duplicates += 1;
                continue;
            }

            // Reading the whole entry verifies its CRC before anything reaches
            // the target.
            io::copy(&mut entry, &mut io::sink())
                .map_err(|e| skip(SourceIssue::Corrupt, format!("{name}: {e}")))?;
            name
        };

        let raw = archive
            .by_index_raw(index)
            .map_err(|e| skip(SourceIssue::Corrupt, format!("{name}: {e}")))?;
        writer.raw_copy_file(raw).map_err(SourceFailure::Target)?;

        seen.insert(name);
        added += 1;
    }

    report.added_entries += added;
    debug!("Merged {} new entries from {:?}", added, source);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use std::io::{Read, Write};
    use zip::write::SimpleFileOptions;

    fn write_jar(path: &Path, entries: &[(&str, &str)]) {
        let file = File::create(path).unwrap();
        let mut zip = ZipWriter::new(file);
        for (name, body) in entries {
            zip.start_file(*name, SimpleFileOptions::default()).unwrap();
            zip.write_all(body.as_bytes()).unwrap();
        }
        zip.finish().unwrap();
    }

    fn read_jar(path: &Path) -> Vec<(String, String)> {
        let mut archive = ZipArchive::new(File::open(path).unwrap()).unwrap();
        let mut out = Vec::new();
        for i in 0..archive.len() {
            let mut entry = archive.by_index(i).unwrap();
            let mut body = String::new();
            entry.read_to_string(&mut body).unwrap();
            out.push((entry.name().to_owned(), body));
        }
        out
    }

    fn content_of(path: &Path, name: &str) -> String {
        read_jar(path)
            .into_iter()
            .find(|(n, _)| n == name)
            .map(|(_, body)| body)
            .unwrap_or_else(|| panic!("{name} missing from {path:?}"))
    }

    fn names(path: &Path) -> BTreeSet<String> {
        read_jar(path).into_iter().map(|(n, _)| n).collect()
    }

    #[test]
    fn first_contributor_wins_and_target_is_never_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("client.jar");
        let s1 = dir.path().join("s1.jar");
        let s2 = dir.path().join("s2.jar");
        write_jar(&target, &[("a.txt", "target-a")]);
        write_jar(&s1, &[("a.txt", "s1-a"), ("b.txt", "s1-b")]);
        write_jar(&s2, &[("b.txt", "s2-b"), ("c.txt", "s2-c")]);

        let report = merge_into_jar(&target, &[s1, s2]).unwrap();

        assert_eq!(
            read_jar(&target),
            vec![
                ("a.txt".to_string(), "target-a".to_string()),
                ("b.txt".to_string(), "s1-b".to_string()),
                ("c.txt".to_string(), "s2-c".to_string()),
            ]
        );
        assert_eq!(report.total_entries, 3);
        assert_eq!(report.added_entries, 2);
        assert_eq!(report.skipped_duplicates, 2);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn source_order_decides_collisions() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.jar");
        let b = dir.path().join("b.jar");
        write_jar(&a, &[("P.class", "from-a")]);
        write_jar(&b, &[("P.class", "from-b")]);

        let ab = dir.path().join("ab.jar");
        let ba = dir.path().join("ba.jar");
        write_jar(&ab, &[]);
        write_jar(&ba, &[]);

        merge_into_jar(&ab, &[a.clone(), b.clone()]).unwrap();
        merge_into_jar(&ba, &[b, a]).unwrap();

        assert_eq!(content_of(&ab, "P.class"), "from-a");
        assert_eq!(content_of(&ba, "P.class"), "from-b");
    }

    #[test]
    fn corrupt_and_missing_sources_are_skipped_with_one_warning_each() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("client.jar");
        let valid1 = dir.path().join("valid1.jar");
        let corrupt = dir.path().join("corrupt.jar");
        let missing = dir.path().join("missing.jar");
        let valid2 = dir.path().join("valid2.jar");
        write_jar(&target, &[]);
        write_jar(&valid1, &[("one.txt", "1")]);
        std::fs::write(&corrupt, b"definitely not a zip archive").unwrap();
        write_jar(&valid2, &[("two.txt", "2")]);

        let report = merge_into_jar(
            &target,
            &[valid1, corrupt.clone(), missing.clone(), valid2],
        )
        .unwrap();

        assert_eq!(
            names(&target),
            BTreeSet::from(["one.txt".to_string(), "two.txt".to_string()])
        );
        assert_eq!(report.warnings.len(), 2);
        assert_eq!(report.warnings[0].source, corrupt);
        assert_eq!(report.warnings[0].issue, SourceIssue::Corrupt);
        assert_eq!(report.warnings[1].source, missing);
        assert_eq!(report.warnings[1].issue, SourceIssue::Unavailable);
    }

    #[test]
    fn entry_failing_mid_source_keeps_earlier_entries_and_moves_on() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("client.jar");
        let damaged = dir.path().join("damaged.jar");
        let ok = dir.path().join("ok.jar");
        write_jar(&target, &[("a.txt", "A")]);
        write_jar(&ok, &[("z.txt", "Z")]);
        {
            let stored =
                || SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
            let mut zip = ZipWriter::new(File::create(&damaged).unwrap());
            zip.start_file("first.txt", stored()).unwrap();
            zip.write_all(b"FIRSTFIRST").unwrap();
            zip.start_file("second.txt", stored()).unwrap();
            zip.write_all(b"SECONDSECOND").unwrap();
            zip.finish().unwrap();
        }
        let mut bytes = std::fs::read(&damaged).unwrap();
        let at = bytes
            .windows(12)
            .position(|w| w == b"SECONDSECOND")
            .unwrap();
        bytes[at] ^= 0xff;
        std::fs::write(&damaged, bytes).unwrap();

        let report = merge_into_jar(&target, &[damaged.clone(), ok]).unwrap();

        assert_eq!(
            read_jar(&target),
            vec![
                ("a.txt".to_string(), "A".to_string()),
                ("first.txt".to_string(), "FIRSTFIRST".to_string()),
                ("z.txt".to_string(), "Z".to_string()),
            ]
        );
        assert_eq!(report.total_entries, 3);
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].source, damaged);
        assert_eq!(report.warnings[0].issue, SourceIssue::Corrupt);
        assert!(report.warnings[0].detail.starts_with("second.txt"));
    }

    #[test]
    fn merging_twice_into_fresh_copies_gives_the_same_entries() {
        let dir = tempfile::tempdir().unwrap();
        let pristine = dir.path().join("pristine.jar");
        let lib1 = dir.path().join("lib1.jar");
        let lib2 = dir.path().join("lib2.jar");
        write_jar(&pristine, &[("net/Main.class", "main")]);
        write_jar(&lib1, &[("META-INF/MANIFEST.MF", "m1"), ("org/A.class", "a")]);
        write_jar(&lib2, &[("META-INF/MANIFEST.MF", "m2"), ("org/B.class", "b")]);
        let sources = vec![lib1, lib2];

        let first = dir.path().join("first.jar");
        let second = dir.path().join("second.jar");
        std::fs::copy(&pristine, &first).unwrap();
        std::fs::copy(&pristine, &second).unwrap();
        merge_into_jar(&first, &sources).unwrap();
        merge_into_jar(&second, &sources).unwrap();

        assert_eq!(read_jar(&first), read_jar(&second));
        assert_eq!(content_of(&first, "META-INF/MANIFEST.MF"), "m1");
    }

    #[test]
    fn remerging_the_same_sources_adds_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("client.jar");
        let lib = dir.path().join("lib.jar");
        write_jar(&target, &[("x", "x")]);
        write_jar(&lib, &[("y", "y")]);

        merge_into_jar(&target, &[lib.clone()]).unwrap();
        let report = merge_into_jar(&target, &[lib]).unwrap();

        assert_eq!(report.added_entries, 0);
        assert_eq!(report.skipped_duplicates, 1);
        assert_eq!(names(&target).len(), 2);
    }

    #[test]
    fn missing_target_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("fresh.jar");
        let lib = dir.path().join("lib.jar");
        write_jar(&lib, &[("only.txt", "content")]);

        let report = merge_into_jar(&target, &[lib]).unwrap();

        assert_eq!(report.total_entries, 1);
        assert_eq!(content_of(&target, "only.txt"), "content");
    }

    #[test]
    fn corrupt_target_is_a_distinct_fatal_error() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("client.jar");
        let lib = dir.path().join("lib.jar");
        std::fs::write(&target, b"garbage").unwrap();
        write_jar(&lib, &[("a", "a")]);

        let err = merge_into_jar(&target, &[lib]).unwrap_err();
        assert!(matches!(err, BundlerError::TargetUnavailable { .. }));
    }

    #[test]
    fn directory_entries_are_carried_over() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("client.jar");
        let lib = dir.path().join("lib.jar");
        write_jar(&target, &[]);
        {
            let mut zip = ZipWriter::new(File::create(&lib).unwrap());
            zip.add_directory("assets/", SimpleFileOptions::default())
                .unwrap();
            zip.start_file("assets/icon.png", SimpleFileOptions::default())
                .unwrap();
            zip.write_all(b"png").unwrap();
            zip.finish().unwrap();
        }

        merge_into_jar(&target, &[lib]).unwrap();

        assert_eq!(
            names(&target),
            BTreeSet::from(["assets/".to_string(), "assets/icon.png".to_string()])
        );
    }
}
