mod common;

use common::Fixture;
use std::fs;
use std::time::{Duration, SystemTime};
use wuic::{Compiler, Mode, Resource};

const PAGE: &str = "<page><comment>v1</comment></page>";

fn age(path: &std::path::Path, by: Duration) {
    let file = fs::File::options().write(true).open(path).unwrap();
    file.set_modified(SystemTime::now() - by).unwrap();
}

#[test]
fn refresh_compiles_only_stale_resources() {
    let fixture = Fixture::new();
    let template = fixture.template("index.wui", PAGE);
    age(&template, Duration::from_secs(120));
    let config = fixture.config().with_mode(Mode::Development);
    let registry = wuic::taglib::core_registry();
    let compiler = Compiler::new(&registry, &config);

    let mut resource = Resource::locate("index.wui", &config).unwrap().unwrap();
    let written = compiler.refresh(&mut resource).unwrap().expect("first refresh compiles");
    assert_eq!(written, resource.destination_path());
    assert!(compiler.refresh(&mut resource).unwrap().is_none());

    fs::write(&template, "<page><comment>v2</comment></page>").unwrap();
    age(resource.destination_path(), Duration::from_secs(60));
    assert!(compiler.refresh(&mut resource).unwrap().is_some());
    assert!(fs::read_to_string(&written).unwrap().contains("// v2"));
}

#[test]
fn production_checks_once() {
    let fixture = Fixture::new();
    let template = fixture.template("index.wui", PAGE);
    age(&template, Duration::from_secs(120));
    let config = fixture.config().with_mode(Mode::Production);
    let registry = wuic::taglib::core_registry();
    let compiler = Compiler::new(&registry, &config);

    let mut resource = Resource::locate("index.wui", &config).unwrap().unwrap();
    assert!(compiler.refresh(&mut resource).unwrap().is_some());

    fs::write(&template, "<page><comment>v2</comment></page>").unwrap();
    assert!(compiler.refresh(&mut resource).unwrap().is_none());

    // a fresh lookup compares timestamps once
    age(resource.destination_path(), Duration::from_secs(60));
    let relocated = Resource::locate("index.wui", &config).unwrap().unwrap();
    assert!(relocated.is_stale().unwrap());
    age(&template, Duration::from_secs(300));
    let relocated = Resource::locate("index.wui", &config).unwrap().unwrap();
    assert!(!relocated.is_stale().unwrap());
}
