//! End-to-end tests: compose file on disk to printed commands.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::path::PathBuf;

use decompose_common::config::{Options, RestartPolicy};
use decompose_common::error::DecomposeError;
use decompose_compose::{LoadOptions, load};
use decompose_core::decompose;

struct Fixture {
    _dir: tempfile::TempDir,
    opts: LoadOptions,
}

fn setup(compose: &str, env: Option<&str>) -> Fixture {
    let dir = tempfile::tempdir().expect("tempdir");
    let compose_file = dir.path().join("docker-compose.yaml");
    std::fs::write(&compose_file, compose).expect("write compose");
    let env_file = env.map(|content| {
        let path: PathBuf = dir.path().join(".env");
        std::fs::write(&path, content).expect("write env");
        path
    });
    Fixture {
        opts: LoadOptions {
            compose_file,
            env_file,
            inherit_env: false,
        },
        _dir: dir,
    }
}

const SIMPLE: &str = r#"
version: "3.9"
services:
  web:
    build: .
    ports:
      - "5000:5000"
    volumes:
      - .:/code
    environment:
      FLASK_ENV: development
  redis:
    image: "redis:alpine"
"#;

const COMPLEX: &str = r#"
version: "3"
services:
    postgres_triple:
        container_name: postgres_triple
        image: postgres:9.5
        volumes:
            - pgdata_triple:/var/lib/postgresql/data
        environment:
            - POSTGRES_PASSWORD=postgres
        networks:
            - db-net
    postgres:
        container_name: postgres
        image: postgres:9.5
        volumes:
            - pgdata:/var/lib/postgresql/data
        environment:
            - POSTGRES_PASSWORD=postgres
        networks:
            - db-net
    collectiwise:
        container_name: collectiwise
        build: .
        image: collectiwise/main:${COLL_TAG}
        ports:
            - "8090:80"
        environment:
            - COLLECTIWISE_BRANCH=${BRANCH}
        networks:
            - db-net
volumes:
    pgdata:
    pgdata_triple:
      driver_opts:
        o: bind
        type: none
        device: "/var/pgdata/triple"

networks:
  db-net:
"#;

#[test]
fn decompose_simple() {
    let fixture = setup(SIMPLE, None);
    let project = load(&fixture.opts).expect("should load");
    let commands = decompose(&project, &Options::default()).expect("should decompose");
    assert_eq!(
        commands,
        vec![
            r#"docker build -f "Dockerfile" -t "web" ."#,
            r#"docker run -d --name "web" -e "FLASK_ENV=development" -p "5000:5000" -v ".:/code" "web""#,
            r#"docker run -d --name "redis" "redis:alpine""#,
        ]
    );
}

#[test]
fn decompose_complex() {
    let fixture = setup(COMPLEX, Some("BRANCH=dev\nCOLL_TAG=l4t3st\n"));
    let project = load(&fixture.opts).expect("should load");
    let opts = Options {
        restart: Some(RestartPolicy::UnlessStopped),
        ..Options::default()
    };
    let commands = decompose(&project, &opts).expect("should decompose");
    assert_eq!(
        commands,
        vec![
            "docker network create db-net",
            r#"docker run -d --name "postgres_triple" -e "POSTGRES_PASSWORD=postgres" --network "db-net" --restart "unless-stopped" -v "/var/pgdata/triple:/var/lib/postgresql/data" "postgres:9.5""#,
            r#"docker run -d --name "postgres" -e "POSTGRES_PASSWORD=postgres" --network "db-net" --restart "unless-stopped" -v "pgdata:/var/lib/postgresql/data" "postgres:9.5""#,
            r#"docker build -f "Dockerfile" -t "collectiwise/main:l4t3st" ."#,
            r#"docker run -d --name "collectiwise" -e "COLLECTIWISE_BRANCH=dev" --network "db-net" -p "8090:80" --restart "unless-stopped" "collectiwise/main:l4t3st""#,
        ]
    );
}

#[test]
fn decompose_selected_services_skips_unused_networks() {
    let fixture = setup(COMPLEX, Some("BRANCH=dev\nCOLL_TAG=l4t3st\n"));
    let project = load(&fixture.opts).expect("should load");
    let opts = Options {
        services: vec!["postgres".into()],
        include_networks: false,
        ..Options::default()
    };
    let commands = decompose(&project, &opts).expect("should decompose");
    assert_eq!(commands.len(), 1);
    assert!(commands[0].starts_with(r#"docker run -d --name "postgres" "#), "{commands:?}");
}

#[test]
fn decompose_respects_depends_on() {
    let compose = r"
services:
  web:
    image: acme/web
    depends_on:
      - api
  api:
    build:
      context: ./api
    depends_on:
      db:
        condition: service_healthy
  db:
    image: postgres:16
";
    let fixture = setup(compose, None);
    let project = load(&fixture.opts).expect("should load");
    let commands = decompose(&project, &Options::default()).expect("should decompose");
    assert_eq!(
        commands,
        vec![
            r#"docker run -d --name "db" "postgres:16""#,
            r#"docker build -f "Dockerfile" -t "api" ./api"#,
            r#"docker run -d --name "api" "api""#,
            r#"docker run -d --name "web" "acme/web""#,
        ]
    );
}

#[test]
fn dependency_cycle_is_reported() {
    let compose = r"
services:
  a:
    image: a
    depends_on: [b]
  b:
    image: b
    depends_on: [a]
";
    let fixture = setup(compose, None);
    let project = load(&fixture.opts).expect("should load");
    let err = decompose(&project, &Options::default()).unwrap_err();
    assert!(matches!(err, DecomposeError::DependencyCycle { ref services } if services.len() == 2));
}

#[test]
fn missing_compose_file_is_an_io_error() {
    let opts = LoadOptions::new("/nonexistent/docker-compose.yaml");
    let err = load(&opts).unwrap_err();
    assert!(matches!(err, DecomposeError::Io { .. }), "{err}");
}
