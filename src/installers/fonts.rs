// Installs the fonts bundled next to the tool (`./fonts` by default) into the user's font
// directory and rebuilds the font cache.
//
// The install directory is append-only: fonts are copied over same-named files but
// nothing is ever removed from it.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use colored::Colorize; // Highlights paths and counts in the log lines.
use walkdir::WalkDir; // Recursive directory traversal.

use crate::libs::config_loading::Settings;
use crate::libs::errors::{InstallOutcome, Result, SetupError};
use crate::libs::host::{CommandSpec, Host};
use crate::{log_debug, log_info, log_warn};

/// Only these suffixes are picked up. Matching is case sensitive.
const FONT_SUFFIXES: [&str; 2] = [".ttf", ".otf"];

fn is_font_file(name: &str) -> bool {
    FONT_SUFFIXES.iter().any(|suffix| name.ends_with(suffix))
}

/// Recursively collects every `.ttf`/`.otf` file under `source_dir`, sorted by path.
///
/// Symbolic links are followed, so linked font files and linked directories are picked up.
/// Dangling links and link cycles are logged and skipped.
///
/// # Arguments
/// * `source_dir`: The directory holding the bundled fonts.
///
/// # Returns
/// * `Result<Vec<PathBuf>>`:
///   - `Ok(paths)` with every matching file, possibly empty.
///   - `Err(SetupError::SourceMissing)` if `source_dir` is not a directory.
///   - `Err(SetupError::Io)` if the directory tree cannot be read.
pub fn find_font_files(source_dir: &Path) -> Result<Vec<PathBuf>> {
    if !source_dir.is_dir() {
        return Err(SetupError::SourceMissing {
            path: source_dir.to_path_buf(),
        });
    }

    let mut fonts = Vec::new();
    for entry in WalkDir::new(source_dir).follow_links(true).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if is_broken_link(&e) => {
                log_warn!(
                    "[Fonts] Skipping unreadable link {}: {}",
                    e.path().map(|p| p.display().to_string()).unwrap_or_default().yellow(),
                    e
                );
                continue;
            }
            Err(e) => return Err(SetupError::Io(e.into())),
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if is_font_file(&name) {
            fonts.push(entry.path().to_path_buf());
        } else {
            log_debug!("[Fonts] Skipping non-font file: {}", entry.path().display());
        }
    }
    Ok(fonts)
}

/// A link cycle, or a link whose target does not exist.
fn is_broken_link(err: &walkdir::Error) -> bool {
    err.loop_ancestor().is_some()
        || (err.depth() > 0
            && err.io_error().is_some_and(|e| e.kind() == io::ErrorKind::NotFound))
}

/// Copies all bundled fonts into `settings.fonts_install_dir`, then runs `fc-cache -f`.
///
/// Unless at least one font is found, the install directory is not created and the cache
/// is not refreshed.
///
/// # Arguments
/// * `host`: Runs `fc-cache`.
/// * `settings`: Supplies `fonts_source_dir` and `fonts_install_dir`.
///
/// # Returns
/// * `Result<InstallOutcome>`:
///   - `Ok(InstallOutcome::Installed)` after copying at least one font and refreshing the cache.
///   - `Ok(InstallOutcome::NothingToDo)` when the source directory holds no font files.
///   - `Err(SetupError::SourceMissing)` when the source directory does not exist.
///   - Any copy or `fc-cache` failure.
pub fn install_fonts(host: &mut dyn Host, settings: &Settings) -> Result<InstallOutcome> {
    let source_dir = &settings.fonts_source_dir;
    log_info!("[Fonts] Looking for fonts in {}", source_dir.display().to_string().cyan());

    let fonts = find_font_files(source_dir)?;
    if fonts.is_empty() {
        log_warn!(
            "[Fonts] No .ttf or .otf files found in {}. Nothing to install.",
            source_dir.display().to_string().yellow()
        );
        return Ok(InstallOutcome::NothingToDo);
    }
    log_info!("[Fonts] Found {} font file(s).", fonts.len().to_string().bold());

    let install_dir = &settings.fonts_install_dir;
    fs::create_dir_all(install_dir)?;

    for font in &fonts {
        let Some(file_name) = font.file_name() else {
            continue;
        };
        let destination = install_dir.join(file_name);
        fs::copy(font, &destination)?;
        log_info!(
            "[Fonts] Copied {} -> {}",
            file_name.to_string_lossy().bold(),
            destination.display()
        );
    }

    log_info!("[Fonts] Rebuilding font cache...");
    host.run(&CommandSpec::new("fc-cache").arg("-f"))?;
    log_info!("[Fonts] {}", "Fonts installed.".green());
    Ok(InstallOutcome::Installed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libs::host::mock::MockHost;
    use tempfile::TempDir;

    fn settings_with_source(home: &Path, source: &Path) -> Settings {
        let mut settings = Settings::for_home(home);
        settings.fonts_source_dir = source.to_path_buf();
        settings
    }

    #[test]
    fn copies_only_font_files_and_refreshes_cache() {
        let home = TempDir::new().unwrap();
        let source = TempDir::new().unwrap();
        fs::write(source.path().join("a.ttf"), b"a").unwrap();
        fs::write(source.path().join("c.txt"), b"c").unwrap();
        fs::create_dir(source.path().join("nested")).unwrap();
        fs::write(source.path().join("nested/b.otf"), b"b").unwrap();

        let settings = settings_with_source(home.path(), source.path());
        let mut host = MockHost::new();
        let outcome = install_fonts(&mut host, &settings).unwrap();

        assert_eq!(outcome, InstallOutcome::Installed);
        let mut installed: Vec<_> = fs::read_dir(&settings.fonts_install_dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        installed.sort();
        assert_eq!(installed, vec!["a.ttf", "b.otf"]);
        assert!(source.path().join("c.txt").exists());
        assert_eq!(host.ran, vec!["fc-cache -f"]);
    }

    #[test]
    fn suffix_match_is_case_sensitive() {
        assert!(is_font_file("Hack.ttf"));
        assert!(is_font_file("Hack.otf"));
        assert!(!is_font_file("Hack.TTF"));
        assert!(!is_font_file("ttf"));
    }

    #[test]
    fn overwrites_existing_font_with_same_name() {
        let home = TempDir::new().unwrap();
        let source = TempDir::new().unwrap();
        fs::write(source.path().join("a.ttf"), b"new").unwrap();
        let settings = settings_with_source(home.path(), source.path());
        fs::create_dir_all(&settings.fonts_install_dir).unwrap();
        fs::write(settings.fonts_install_dir.join("a.ttf"), b"old").unwrap();
        fs::write(settings.fonts_install_dir.join("keep.otf"), b"keep").unwrap();

        install_fonts(&mut MockHost::new(), &settings).unwrap();

        assert_eq!(fs::read(settings.fonts_install_dir.join("a.ttf")).unwrap(), b"new");
        assert!(settings.fonts_install_dir.join("keep.otf").exists());
    }

    #[test]
    fn missing_source_is_reported_without_side_effects() {
        let home = TempDir::new().unwrap();
        let settings = settings_with_source(home.path(), &home.path().join("no-fonts-here"));
        let mut host = MockHost::new();

        let err = install_fonts(&mut host, &settings).unwrap_err();
        assert!(matches!(err, SetupError::SourceMissing { .. }));
        assert!(!settings.fonts_install_dir.exists());
        assert!(host.ran.is_empty());
    }

    #[test]
    fn empty_source_is_nothing_to_do() {
        let home = TempDir::new().unwrap();
        let source = TempDir::new().unwrap();
        fs::write(source.path().join("README.md"), b"no fonts").unwrap();
        let settings = settings_with_source(home.path(), source.path());
        let mut host = MockHost::new();

        let outcome = install_fonts(&mut host, &settings).unwrap();
        assert_eq!(outcome, InstallOutcome::NothingToDo);
        assert!(!settings.fonts_install_dir.exists());
        assert!(host.ran.is_empty());
    }

    #[test]
    fn cache_refresh_failure_propagates() {
        let home = TempDir::new().unwrap();
        let source = TempDir::new().unwrap();
        fs::write(source.path().join("a.ttf"), b"a").unwrap();
        let settings = settings_with_source(home.path(), source.path());
        let mut host = MockHost::new();
        host.fail_matching = Some("fc-cache".to_string());

        let err = install_fonts(&mut host, &settings).unwrap_err();
        assert!(matches!(err, SetupError::CommandFailed { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_fonts_are_installed() {
        use std::os::unix::fs::symlink;

        let home = TempDir::new().unwrap();
        let source = TempDir::new().unwrap();
        let elsewhere = TempDir::new().unwrap();
        fs::write(elsewhere.path().join("linked.ttf"), b"linked").unwrap();
        fs::create_dir(elsewhere.path().join("family")).unwrap();
        fs::write(elsewhere.path().join("family/bold.otf"), b"bold").unwrap();
        symlink(elsewhere.path().join("linked.ttf"), source.path().join("linked.ttf")).unwrap();
        symlink(elsewhere.path().join("family"), source.path().join("family")).unwrap();
        symlink(elsewhere.path().join("gone.ttf"), source.path().join("dangling.ttf")).unwrap();

        let settings = settings_with_source(home.path(), source.path());
        let outcome = install_fonts(&mut MockHost::new(), &settings).unwrap();

        assert_eq!(outcome, InstallOutcome::Installed);
        assert_eq!(
            fs::read(settings.fonts_install_dir.join("linked.ttf")).unwrap(),
            b"linked"
        );
        assert!(settings.fonts_install_dir.join("bold.otf").exists());
        assert!(!settings.fonts_install_dir.join("dangling.ttf").exists());
    }
}
