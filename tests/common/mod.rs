/// Common test utilities and helpers for gitcc tests

use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

use gitcc::Config;

/// Run git in `dir` and panic with its stderr on failure
pub fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args([
            "-c",
            "user.name=gitcc tests",
            "-c",
            "user.email=tests@gitcc.invalid",
            "-c",
            "commit.gpgsign=false",
        ])
        .args(args)
        .current_dir(dir)
        .output()
        .expect("Failed to execute git");

    assert!(
        output.status.success(),
        "git {:?} failed in {}: {}",
        args,
        dir.display(),
        String::from_utf8_lossy(&output.stderr)
    );

    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Scratch area holding bare "remote" repositories and a local GOPATH
pub struct TestEnvironment {
    pub temp_dir: TempDir,
    pub remotes: PathBuf,
    pub gopath: PathBuf,
    work: PathBuf,
}

impl TestEnvironment {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let remotes = temp_dir.path().join("remotes");
        let gopath = temp_dir.path().join("gopath");
        let work = temp_dir.path().join("work");

        for dir in [&remotes, &gopath, &work] {
            std::fs::create_dir_all(dir).expect("Failed to create fixture dir");
        }

        Self {
            temp_dir,
            remotes,
            gopath,
            work,
        }
    }

    /// Config whose clone URLs resolve to the local bare repositories
    pub fn config(&self) -> Config {
        let mut config = Config::from_gopath(&self.gopath.to_string_lossy());
        config.clone_base_url = format!("file://{}", self.remotes.display());
        config
    }

    /// Create `<remotes>/<user>/<repo>.git` with one commit on master
    pub fn create_remote(&self, user: &str, repo: &str) -> PathBuf {
        let work = self.work.join(user).join(repo);
        std::fs::create_dir_all(&work).expect("Failed to create work dir");

        git(&work, &["init", "--quiet"]);
        git(&work, &["symbolic-ref", "HEAD", "refs/heads/master"]);
        std::fs::write(work.join("README.md"), format!("# {}\n", repo)).unwrap();
        git(&work, &["add", "README.md"]);
        git(&work, &["commit", "--quiet", "-m", "Initial commit"]);

        let owner_remotes = self.remotes.join(user);
        std::fs::create_dir_all(&owner_remotes).unwrap();
        let bare = owner_remotes.join(format!("{}.git", repo));
        git(
            &owner_remotes,
            &["clone", "--quiet", "--bare", &work.to_string_lossy(), &bare.to_string_lossy()],
        );
        git(&work, &["remote", "add", "origin", &bare.to_string_lossy()]);

        bare
    }

    /// Commit `file` on master in the upstream work tree and push it to the remote
    pub fn push_commit(&self, user: &str, repo: &str, file: &str, contents: &str) {
        let work = self.work.join(user).join(repo);
        std::fs::write(work.join(file), contents).unwrap();
        git(&work, &["add", file]);
        git(&work, &["commit", "--quiet", "-m", &format!("Update {}", file)]);
        git(&work, &["push", "--quiet", "origin", "master"]);
    }

    /// Where gitcc keeps its checkout of `user/repo`
    pub fn checkout(&self, user: &str, repo: &str) -> PathBuf {
        self.config().repo_path(user, repo)
    }
}

/// Assertion helpers for test validation
pub fn assert_contains_all(text: &str, expected: &[&str]) {
    for item in expected {
        assert!(
            text.contains(item),
            "Expected text to contain '{}', but it didn't. Text: {}",
            item,
            text
        );
    }
}
