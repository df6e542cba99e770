use std::path::PathBuf;

use indoc::indoc;

use crate::{EnvironmentOptions, FilesystemOptions, Options};

#[test]
fn parse_minversions_toml() {
    let options: Options = toml::from_str(indoc! {r#"
        minversions = true
        package = "dist/demo-1.0.tar.gz"

        [env.py312]
        deps = ["pytest"]
        extras = ["tests"]
        usedevelop = false
        setenv = { TOX_PACKAGE = "dist/other-1.0.tar.gz" }

        [env.lint]
        skip-install = true
    "#})
    .unwrap();

    assert_eq!(options.minversions, Some(true));
    assert_eq!(
        options.environment("py312"),
        EnvironmentOptions {
            deps: Some(vec!["pytest".to_string()]),
            extras: Some(vec!["tests".to_string()]),
            usedevelop: Some(false),
            setenv: Some(
                [(
                    "TOX_PACKAGE".to_string(),
                    "dist/other-1.0.tar.gz".to_string()
                )]
                .into_iter()
                .collect()
            ),
            ..EnvironmentOptions::default()
        }
    );
    assert_eq!(options.environment("lint").skip_install, Some(true));
    assert_eq!(options.environment("missing"), EnvironmentOptions::default());
}

#[test]
fn unknown_field() {
    let err = toml::from_str::<Options>(indoc! {r#"
        [env.py312]
        skip_install = true
    "#})
    .unwrap_err();
    assert!(err.to_string().contains("unknown field `skip_install`"));
}

#[test]
fn relative_paths() {
    let options: Options = toml::from_str(indoc! {r#"
        package = "dist/demo-1.0.tar.gz"
        python = "python3.12"

        [env.py]
        envdir = ".envs/py"
        python = "bin/python"
    "#})
    .unwrap();
    let options = options.relative_to(&PathBuf::from("/project"));

    assert_eq!(
        options.package,
        Some(PathBuf::from("/project/dist/demo-1.0.tar.gz"))
    );
    assert_eq!(options.python, Some(PathBuf::from("python3.12")));
    let env = options.environment("py");
    assert_eq!(env.envdir, Some(PathBuf::from("/project/.envs/py")));
    assert_eq!(env.python, Some(PathBuf::from("/project/bin/python")));
}

#[test]
fn find_in_ancestor() -> anyhow::Result<()> {
    let root = tempfile::tempdir()?;
    let nested = root.path().join("src").join("demo");
    fs_err::create_dir_all(&nested)?;

    // A `pyproject.toml` without a `[tool.minversions]` table is skipped.
    fs_err::write(
        root.path().join("src").join("pyproject.toml"),
        "[project]\nname = \"demo\"\n",
    )?;
    fs_err::write(
        root.path().join("pyproject.toml"),
        indoc! {r"
            [tool.minversions.env.py]
            minversions = true
        "},
    )?;

    let options = FilesystemOptions::find(&nested)?.unwrap();
    assert_eq!(options.root(), std::path::absolute(root.path())?);
    assert_eq!(options.environment("py").minversions, Some(true));
    Ok(())
}

#[test]
fn prefer_minversions_toml() -> anyhow::Result<()> {
    let root = tempfile::tempdir()?;
    fs_err::write(
        root.path().join("pyproject.toml"),
        "[tool.minversions]\nminversions = false\n",
    )?;
    fs_err::write(root.path().join("minversions.toml"), "minversions = true\n")?;

    let options = FilesystemOptions::from_directory(root.path())?.unwrap();
    assert_eq!(options.minversions, Some(true));
    Ok(())
}

#[test]
fn invalid_file() {
    let root = tempfile::tempdir().unwrap();
    let path = root.path().join("minversions.toml");
    fs_err::write(&path, "minversions = \"yes\"\n").unwrap();

    let err = FilesystemOptions::from_file(&path).unwrap_err();
    assert!(err.to_string().starts_with("Failed to parse: `"));
}
