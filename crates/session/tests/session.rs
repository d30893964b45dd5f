//! Tests for setup and the turn loop.

use agent::{Answer, Assistant, Event, Observer};
use anyhow::{Result, bail};
use database::{Connector, Credentials, Database, Options, Source, Target};
use sqlchat_session::{
    Bootstrap, Connect, GREETING, Halt, Role, Session, Setup, Sidebar, State, Surface, Turn,
    prepare,
};
use std::{
    cell::{Cell, RefCell},
    path::{Path, PathBuf},
    sync::Arc,
};

/// Records everything drawn.
#[derive(Default)]
struct Recorder {
    turns: Vec<Turn>,
    events: Vec<Event>,
    infos: Vec<String>,
    errors: Vec<String>,
}

impl Surface for Recorder {
    fn turn(&mut self, turn: &Turn) {
        self.turns.push(turn.clone());
    }

    fn trace(&mut self, event: &Event) {
        self.events.push(event.clone());
    }

    fn info(&mut self, message: &str) {
        self.infos.push(message.into());
    }

    fn error(&mut self, message: &str) {
        self.errors.push(message.into());
    }
}

/// Answers every question with a fixed text.
#[derive(Default)]
struct Fake {
    answer: String,
    fail: bool,
    queries: RefCell<Vec<String>>,
}

impl Fake {
    fn answering(answer: &str) -> Self {
        Self {
            answer: answer.into(),
            ..Default::default()
        }
    }
}

impl Assistant for Fake {
    async fn run(&self, query: &str, observer: &mut dyn Observer) -> Result<Answer> {
        self.queries.borrow_mut().push(query.into());
        let action = Event::Action {
            tool: "sql_db_list_tables".into(),
            input: "{}".into(),
        };
        observer.observe(&action);
        if self.fail {
            bail!("model unavailable");
        }

        let finish = Event::Finish(self.answer.clone());
        observer.observe(&finish);
        Ok(Answer {
            text: self.answer.clone(),
            trace: vec![action, finish],
            steps: 1,
        })
    }
}

/// Connector that validates like the real one but opens nothing.
#[derive(Default)]
struct CountingConnector {
    calls: Cell<usize>,
}

impl Connect for CountingConnector {
    type Handle = Target;

    async fn connect(&self, target: &Target) -> database::Result<Target> {
        self.calls.set(self.calls.get() + 1);
        target.validate()?;
        Ok(target.clone())
    }
}

#[derive(Default)]
struct CountingBootstrap {
    calls: Cell<usize>,
    keys: RefCell<Vec<String>>,
}

impl<H> Bootstrap<H> for CountingBootstrap {
    type Agent = Fake;

    fn bootstrap(&self, _handle: H, api_key: &str) -> Result<Fake> {
        self.calls.set(self.calls.get() + 1);
        self.keys.borrow_mut().push(api_key.into());
        Ok(Fake::answering("There are 3 rows."))
    }
}

fn embedded() -> PathBuf {
    PathBuf::from("/srv/sqlchat/pr_report.db")
}

fn credentials() -> Credentials {
    Credentials {
        host: "localhost:3306".into(),
        user: "root".into(),
        password: "secret".into(),
        database: "prs".into(),
    }
}

#[tokio::test]
async fn no_source_halts() {
    let connector = CountingConnector::default();
    let bootstrap = CountingBootstrap::default();
    let sidebar = Sidebar {
        api_key: "gsk_test".into(),
        ..Default::default()
    };

    let setup = prepare(&sidebar, &embedded(), &connector, &bootstrap)
        .await
        .unwrap();
    assert!(matches!(setup, Setup::Halted(Halt::MissingDatabase)));
    assert_eq!(connector.calls.get(), 0);
}

#[tokio::test]
async fn blank_api_key_connects_nothing() {
    for api_key in ["", "   "] {
        for sidebar in [
            Sidebar::embedded(api_key),
            Sidebar::remote(credentials(), api_key),
        ] {
            let connector = CountingConnector::default();
            let bootstrap = CountingBootstrap::default();
            let setup = prepare(&sidebar, &embedded(), &connector, &bootstrap)
                .await
                .unwrap();

            let Setup::Halted(halt) = setup else {
                panic!("expected a halt");
            };
            assert_eq!(halt, Halt::MissingApiKey);
            assert_eq!(halt.message(), "Please add the Groq API Key");
            assert_eq!(connector.calls.get(), 0);
            assert_eq!(bootstrap.calls.get(), 0);
        }
    }
}

#[tokio::test]
async fn blank_remote_field_halts_before_a_handle() {
    for field in 0..4 {
        let mut credentials = credentials();
        match field {
            0 => credentials.host.clear(),
            1 => credentials.user.clear(),
            2 => credentials.password.clear(),
            _ => credentials.database.clear(),
        }
        let sidebar = Sidebar::remote(credentials, "gsk_test");
        let connector = CountingConnector::default();
        let bootstrap = CountingBootstrap::default();

        let setup = prepare(&sidebar, &embedded(), &connector, &bootstrap)
            .await
            .unwrap();
        assert!(matches!(
            setup,
            Setup::Halted(Halt::MissingCredentials(ref fields)) if fields.len() == 1
        ));
        assert_eq!(bootstrap.calls.get(), 0);
    }
}

#[tokio::test]
async fn ready_with_trimmed_key() {
    let connector = CountingConnector::default();
    let bootstrap = CountingBootstrap::default();
    let sidebar = Sidebar::remote(credentials(), " gsk_test ");

    let setup = prepare(&sidebar, &embedded(), &connector, &bootstrap)
        .await
        .unwrap();
    assert!(matches!(setup, Setup::Ready(_)));
    assert_eq!(connector.calls.get(), 1);
    assert_eq!(*bootstrap.keys.borrow(), ["gsk_test"]);
}

#[test]
fn halts_report_on_the_right_channel() {
    let mut surface = Recorder::default();
    Halt::MissingDatabase.report(&mut surface);
    Halt::MissingApiKey.report(&mut surface);
    Halt::MissingCredentials(vec!["password"]).report(&mut surface);

    assert_eq!(
        surface.infos,
        [
            "Please enter the database information and URI",
            "Please add the Groq API Key"
        ]
    );
    assert_eq!(
        surface.errors,
        ["Please provide the MySQL database information"]
    );
}

#[test]
fn sidebar_targets() {
    let path = Path::new("/data/pr_report.db");
    assert_eq!(Sidebar::default().target(path), None);
    assert_eq!(
        Sidebar::embedded("k").target(path),
        Some(Target::Embedded(path.to_path_buf()))
    );
    assert_eq!(
        Sidebar::remote(credentials(), "k").target(path),
        Some(Target::Remote(credentials()))
    );

    let debug = format!("{:?}", Sidebar::remote(credentials(), "gsk_secret"));
    assert!(!debug.contains("secret"), "{debug}");
    assert_eq!(Sidebar::embedded("k").source, Some(Source::Embedded));
}

#[tokio::test]
async fn blank_input_is_ignored() {
    let mut session = Session::new();
    let agent = Fake::answering("unused");
    let mut surface = Recorder::default();

    let answer = session.submit("  \n", &agent, &mut surface).await.unwrap();
    assert_eq!(answer, None);
    assert_eq!(session.transcript().len(), 1);
    assert!(agent.queries.borrow().is_empty());
    assert!(surface.turns.is_empty());
}

#[tokio::test]
async fn submit_appends_question_and_answer() {
    let mut session = Session::new();
    let agent = Fake::answering("There are 3 rows.");
    let mut surface = Recorder::default();

    let answer = session
        .submit("how many rows are in the report table", &agent, &mut surface)
        .await
        .unwrap();
    assert_eq!(answer.as_deref(), Some("There are 3 rows."));
    assert_eq!(session.state(), State::Idle);
    assert_eq!(
        session.transcript().turns(),
        [
            Turn::assistant(GREETING),
            Turn::user("how many rows are in the report table"),
            Turn::assistant("There are 3 rows."),
        ]
    );
    assert_eq!(surface.turns, session.transcript().turns()[1..]);
    assert_eq!(surface.events.len(), 2);
}

#[tokio::test]
async fn failed_turn_keeps_the_question() {
    let mut session = Session::new();
    let agent = Fake {
        fail: true,
        ..Default::default()
    };
    let mut surface = Recorder::default();

    let err = session
        .submit("count rows", &agent, &mut surface)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "model unavailable");
    assert_eq!(session.state(), State::Idle);
    assert_eq!(session.transcript().len(), 2);
    assert_eq!(session.transcript().last(), &Turn::user("count rows"));
    assert_eq!(surface.events.len(), 1);
}

#[tokio::test]
async fn reset_after_turns() {
    let mut session = Session::new();
    let agent = Fake::answering("ok");
    let mut surface = Recorder::default();
    session.submit("one", &agent, &mut surface).await.unwrap();
    session.submit("two", &agent, &mut surface).await.unwrap();
    assert_eq!(session.transcript().len(), 5);

    session.reset();
    assert_eq!(session.state(), State::Idle);
    assert_eq!(session.transcript().turns(), [Turn::assistant(GREETING)]);

    let mut redraw = Recorder::default();
    session.render(&mut redraw);
    assert_eq!(redraw.turns, [Turn::assistant(GREETING)]);
}

#[tokio::test]
async fn embedded_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pr_report.db");
    let uri = format!("sqlite://{}?mode=rwc", path.display());
    let seed = Database::connect(&uri, &Options::default()).await.unwrap();
    seed.run("CREATE TABLE report (id INTEGER PRIMARY KEY)").await.unwrap();
    seed.close().await;

    struct Opened(RefCell<Option<Arc<Database>>>);
    impl Bootstrap<Arc<Database>> for Opened {
        type Agent = Fake;

        fn bootstrap(&self, handle: Arc<Database>, _api_key: &str) -> Result<Fake> {
            *self.0.borrow_mut() = Some(handle);
            Ok(Fake::answering("There are 0 rows."))
        }
    }

    let connector = Connector::default();
    let bootstrap = Opened(RefCell::new(None));
    let setup = prepare(&Sidebar::embedded("gsk_test"), &path, &connector, &bootstrap)
        .await
        .unwrap();
    let Setup::Ready(agent) = setup else {
        panic!("expected a ready agent");
    };

    let handle = bootstrap.0.borrow().clone().unwrap();
    assert_eq!(handle.list_tables().await.unwrap(), ["report"]);

    let mut session = Session::new();
    let mut surface = Recorder::default();
    session
        .submit("how many rows are in the report table", &agent, &mut surface)
        .await
        .unwrap();

    assert_eq!(
        *agent.queries.borrow(),
        ["how many rows are in the report table"]
    );
    let roles: Vec<_> = session.transcript().turns().iter().map(|t| t.role).collect();
    assert_eq!(roles, [Role::Assistant, Role::User, Role::Assistant]);

    // reopening the settings with the same selection reuses the handle
    prepare(&Sidebar::embedded("gsk_test"), &path, &connector, &bootstrap)
        .await
        .unwrap();
    let again = bootstrap.0.borrow().clone().unwrap();
    assert!(Arc::ptr_eq(&handle, &again));
}

#[tokio::test]
async fn blank_password_scenario() {
    let mut credentials = credentials();
    credentials.password.clear();
    let sidebar = Sidebar::remote(credentials, "gsk_test");
    let bootstrap = CountingBootstrap::default();

    let setup = prepare(&sidebar, &embedded(), &Connector::default(), &bootstrap)
        .await
        .unwrap();
    let Setup::Halted(halt) = setup else {
        panic!("expected a halt");
    };
    assert_eq!(halt, Halt::MissingCredentials(vec!["password"]));

    let mut surface = Recorder::default();
    halt.report(&mut surface);
    assert_eq!(
        surface.errors,
        ["Please provide the MySQL database information"]
    );
    assert_eq!(bootstrap.calls.get(), 0);
}
