use recipe_prep::{
    default_tokenizer, load_raw_dir, load_recipes, run_pipeline, tokenize_with, PrepConfig,
    TokenizedCorpus, SEPARATOR,
};
use indexmap::IndexMap;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const RAW_RECIPES: &str = r#"
{
    "a1": {
        "title": "Banana Bread",
        "ingredients": ["3 ripe bananas", "2 cups flour ADVERTISEMENT"],
        "instructions": "Mash the bananas. Bake for 1 hour.",
        "picture_link": "abc123"
    },
    "b2": {
        "title": "Mystery",
        "ingredients": ["1 secret"],
        "instructions": null
    },
    "c3": {
        "title": "Iced Tea",
        "ingredients": ["4 tea bags"],
        "instructions": "Steep, then chill. ADVERTISEMENT"
    }
}
"#;

const ABBREVIATIONS: &str = r#"{"abbreviations": ["tsp", "tbsp", "oz"]}"#;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn data_dir(with_tokenizer_data: bool) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("recipes_raw_nosource_ar.json"), RAW_RECIPES).unwrap();
    if with_tokenizer_data {
        write_tokenizer_data(dir.path());
    }
    dir
}

fn write_tokenizer_data(path_data: &Path) {
    let tokenizer_dir = path_data.join("tokenizer");
    fs::create_dir_all(&tokenizer_dir).unwrap();
    fs::write(tokenizer_dir.join("abbreviations.json"), ABBREVIATIONS).unwrap();
}

fn quiet_config(path_data: &Path) -> PrepConfig {
    let mut config = PrepConfig::default().with_path_data(path_data);
    config.pipeline.progress = false;
    config
}

#[test]
fn test_run_pipeline_builds_table() {
    init_logging();
    let dir = data_dir(true);
    let config = quiet_config(dir.path());

    let table = run_pipeline(&config).unwrap();

    assert_eq!(table.len(), 2);
    assert_eq!(table.title, vec!["Banana Bread", "Iced Tea"]);
    assert_eq!(
        table.ingredients[0],
        vec!["3 ripe bananas ", " 2 cup flour "]
    );
    assert_eq!(table.instructions[0], "Mash the bananas . Bake for 1 hour .");
    assert_eq!(table.ingredients[1], vec!["4 tea bags "]);
    assert_eq!(table.instructions[1], "Steep , then chill .");
    assert!(table.separator.iter().all(|s| s == SEPARATOR));
}

#[test]
fn test_run_pipeline_writes_tokens_file() {
    let dir = data_dir(true);
    let config = quiet_config(dir.path());

    run_pipeline(&config).unwrap();

    let corpus: TokenizedCorpus = load_recipes(dir.path()).unwrap();
    let (titles, bodies) = corpus.unzip();
    assert_eq!(titles, vec!["Banana Bread", "Iced Tea"]);
    assert_eq!(
        bodies[0],
        "3 ripe bananas ; 2 cup flour ;Mash the bananas . Bake for 1 hour ."
    );
    assert_eq!(bodies[1], "4 tea bags ;Steep , then chill .");
}

#[test]
fn test_write_tokens_can_be_disabled() {
    let dir = data_dir(true);
    let mut config = quiet_config(dir.path());
    config.pipeline.write_tokens = false;

    run_pipeline(&config).unwrap();
    assert!(!dir.path().join("tokens.pkl").exists());
}

#[test]
fn test_parallel_matches_sequential() {
    let dir = data_dir(true);
    let mut config = quiet_config(dir.path());
    let recipes = load_raw_dir(dir.path()).unwrap();
    let tokenizer = default_tokenizer(&config);

    let sequential = tokenize_with(&tokenizer, &recipes, &config).unwrap();
    config.pipeline.parallel = true;
    let parallel = tokenize_with(&tokenizer, &recipes, &config).unwrap();

    assert_eq!(sequential.len(), 2);
    assert_eq!(sequential, parallel);
}

#[test]
fn test_parallel_keeps_order_on_larger_input() {
    let dir = tempfile::tempdir().unwrap();
    write_tokenizer_data(dir.path());

    let mut raw: IndexMap<String, serde_json::Value> = IndexMap::new();
    for i in 0..200 {
        let recipe = if i % 3 == 1 {
            serde_json::json!({ "title": format!("Dish {i}"), "instructions": null })
        } else {
            serde_json::json!({
                "title": format!("Dish {i}"),
                "ingredients": [format!("{i} cups water")],
                "instructions": "Boil."
            })
        };
        raw.insert(format!("id{i}"), recipe);
    }
    fs::write(
        dir.path().join("recipes_raw_generated.json"),
        serde_json::to_string(&raw).unwrap(),
    )
    .unwrap();

    let mut config = quiet_config(dir.path());
    config.pipeline.parallel = true;
    let recipes = load_raw_dir(dir.path()).unwrap();
    let corpus = tokenize_with(&default_tokenizer(&config), &recipes, &config).unwrap();

    let expected: Vec<String> = (0..200)
        .filter(|i| i % 3 != 1)
        .map(|i| format!("Dish {i}"))
        .collect();
    let (titles, _) = corpus.unzip();
    assert_eq!(titles, expected);
}

#[test]
fn test_eager_download_fetches_tokenizer_data() {
    init_logging();
    let dir = data_dir(false);
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/abbreviations.json")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(ABBREVIATIONS)
        .expect(1)
        .create();

    let mut config = quiet_config(dir.path());
    config.tokenizer.data_url = Some(format!("{}/abbreviations.json", server.url()));

    let table = run_pipeline(&config).unwrap();

    mock.assert();
    assert_eq!(table.len(), 2);
    assert!(dir.path().join("tokenizer/abbreviations.json").is_file());
}

#[test]
fn test_default_settings_install_bundled_tokenizer_data() {
    init_logging();
    let dir = data_dir(false);
    let config = quiet_config(dir.path());
    assert!(config.tokenizer.data_url.is_none());
    assert!(config.tokenizer.eager_download);

    let table = run_pipeline(&config).unwrap();

    assert_eq!(table.len(), 2);
    assert_eq!(table.instructions[0], "Mash the bananas . Bake for 1 hour .");
    assert!(dir.path().join("tokenizer/abbreviations.json").is_file());
}

#[test]
fn test_lazy_download_installs_bundled_tokenizer_data() {
    let dir = data_dir(false);
    let mut config = quiet_config(dir.path());
    config.tokenizer.eager_download = false;
    config.pipeline.parallel = true;

    let table = run_pipeline(&config).unwrap();

    assert_eq!(table.title, vec!["Banana Bread", "Iced Tea"]);
    assert!(dir.path().join("tokenizer/abbreviations.json").is_file());
}

#[test]
fn test_missing_data_dir_is_load_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = quiet_config(&dir.path().join("does-not-exist"));

    let result = run_pipeline(&config);
    assert!(matches!(result, Err(recipe_prep::PrepError::Load { .. })));
}
