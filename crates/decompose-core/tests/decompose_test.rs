//! End-to-end tests of the decomposition pipeline over hand-built projects.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use decompose_common::config::{Options, RestartPolicy};
use decompose_common::error::DecomposeError;
use decompose_common::types::{
    BuildSpec, MountKind, Network, PortMapping, Project, Service, Volume, VolumeMount,
};
use decompose_core::decompose;

fn position(commands: &[String], needle: &str) -> usize {
    commands
        .iter()
        .position(|c| c.contains(needle))
        .unwrap_or_else(|| panic!("no command contains {needle}: {commands:#?}"))
}

fn web_and_redis() -> Project {
    let mut web = Service::new("web");
    web.build = Some(BuildSpec::default());
    web.ports = vec![PortMapping::new("5000", "5000")];
    let mut redis = Service::new("redis");
    redis.image = Some("redis:alpine".into());
    Project {
        services: vec![web, redis],
        ..Project::default()
    }
}

#[test]
fn build_and_image_services() {
    let commands = decompose(&web_and_redis(), &Options::default()).expect("should decompose");
    assert_eq!(
        commands,
        vec![
            r#"docker build -t "web" ."#,
            r#"docker run -d --name "web" -p "5000:5000" "web""#,
            r#"docker run -d --name "redis" "redis:alpine""#,
        ]
    );
}

#[test]
fn named_volume_device_is_mounted() {
    let mut db = Service::new("db");
    db.image = Some("postgres:16".into());
    db.volumes = vec![VolumeMount::new("data", "/var/lib/data", MountKind::Volume)];
    let project = Project {
        services: vec![db],
        volumes: vec![Volume::new("data").with_device("/data/x")],
        ..Project::default()
    };
    let commands = decompose(&project, &Options::default()).expect("should decompose");
    assert_eq!(commands.len(), 1);
    assert!(commands[0].contains(r#"-v "/data/x:/var/lib/data""#), "{commands:?}");
}

#[test]
fn restart_override_applies_to_every_service() {
    let mut project = web_and_redis();
    project.services[0].restart = Some("always".into());
    project.services[1].restart = Some("no".into());
    let opts = Options {
        restart: Some(RestartPolicy::UnlessStopped),
        ..Options::default()
    };
    let commands = decompose(&project, &opts).expect("should decompose");
    let runs: Vec<&String> = commands.iter().filter(|c| c.starts_with("docker run")).collect();
    assert_eq!(runs.len(), 2);
    for run in runs {
        assert!(run.contains(r#"--restart "unless-stopped""#), "{run}");
        assert!(!run.contains(r#"--restart "always""#), "{run}");
    }
}

#[test]
fn dependencies_emitted_before_dependents() {
    let mut api = Service::new("api");
    api.build = Some(BuildSpec::default());
    api.depends_on = vec!["db".into(), "cache".into()];
    let mut worker = Service::new("worker");
    worker.depends_on = vec!["api".into()];
    let project = Project {
        services: vec![worker, api, Service::new("cache"), Service::new("db")],
        ..Project::default()
    };
    let commands = decompose(&project, &Options::default()).expect("should decompose");
    assert_eq!(commands.len(), 5);
    let api_build = position(&commands, r#"-t "api""#);
    let api_run = position(&commands, r#"--name "api""#);
    assert!(api_build < api_run);
    assert!(position(&commands, r#"--name "db""#) < api_build);
    assert!(position(&commands, r#"--name "cache""#) < api_build);
    assert!(api_run < position(&commands, r#"--name "worker""#));
}

#[test]
fn only_used_networks_are_created() {
    let mut web = Service::new("web");
    web.networks = vec!["default".into(), "front".into()];
    let project = Project {
        services: vec![web],
        networks: vec![Network::new("front"), Network::new("unused"), Network::new("default")],
        ..Project::default()
    };
    let commands = decompose(&project, &Options::default()).expect("should decompose");
    assert_eq!(
        commands,
        vec![
            "docker network create front",
            r#"docker run -d --name "web" --network "front" "web""#,
        ]
    );

    let opts = Options {
        include_networks: false,
        ..Options::default()
    };
    let commands = decompose(&project, &opts).expect("should decompose");
    assert!(commands.iter().all(|c| !c.contains("network create")));
}

#[test]
fn inclusion_list_drops_other_services() {
    let opts = Options {
        services: vec!["redis".into()],
        ..Options::default()
    };
    let commands = decompose(&web_and_redis(), &opts).expect("should decompose");
    assert_eq!(commands, vec![r#"docker run -d --name "redis" "redis:alpine""#]);
}

#[test]
fn image_reference_names_the_build_tag() {
    let mut app = Service::new("app");
    app.container_name = Some("app-container".into());
    app.image = Some("acme/app:1.0".into());
    app.build = Some(BuildSpec {
        dockerfile: Some("Dockerfile".into()),
        ..BuildSpec::default()
    });
    let project = Project {
        services: vec![app],
        ..Project::default()
    };
    let commands = decompose(&project, &Options::default()).expect("should decompose");
    assert_eq!(commands[0], r#"docker build -f "Dockerfile" -t "acme/app:1.0" ."#);
    assert_eq!(commands[1], r#"docker run -d --name "app" "acme/app:1.0""#);
}

#[test]
fn cycle_fails_without_output() {
    let mut a = Service::new("a");
    a.depends_on = vec!["b".into()];
    let mut b = Service::new("b");
    b.depends_on = vec!["a".into()];
    let project = Project {
        services: vec![a, b],
        ..Project::default()
    };
    let err = decompose(&project, &Options::default()).unwrap_err();
    assert!(matches!(err, DecomposeError::DependencyCycle { .. }), "{err}");
}

#[test]
fn cycle_outside_scope_is_ignored() {
    let mut a = Service::new("a");
    a.depends_on = vec!["b".into()];
    let mut b = Service::new("b");
    b.depends_on = vec!["a".into()];
    let project = Project {
        services: vec![a, b],
        ..Project::default()
    };
    let opts = Options {
        services: vec!["a".into()],
        ..Options::default()
    };
    let commands = decompose(&project, &opts).expect("should decompose");
    assert_eq!(commands, vec![r#"docker run -d --name "a" "a""#]);
}
