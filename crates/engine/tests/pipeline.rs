use analytics::MovingAverageEngine;
use core_types::{ErrorRecord, RawTable, RunReport, Status, Ticker};
use data_source::DataSource;
use engine::{Engine, RunAggregator, RunObserver, TickerAnalysis, TickerPipeline};
use rust_decimal_macros::dec;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

enum Canned {
    Table(RawTable),
    Empty,
    Fail,
}

/// A data source that replays prepared answers per ticker.
struct StubSource {
    answers: HashMap<String, Canned>,
}

impl StubSource {
    fn new() -> Self {
        Self { answers: HashMap::new() }
    }

    fn with(mut self, ticker: &str, answer: Canned) -> Self {
        self.answers.insert(ticker.to_string(), answer);
        self
    }
}

impl DataSource for StubSource {
    fn name(&self) -> &'static str {
        "Stub"
    }

    fn fetch(&self, ticker: &Ticker) -> data_source::Result<Option<RawTable>> {
        match self.answers.get(ticker.as_str()) {
            Some(Canned::Table(table)) => Ok(Some(table.clone())),
            Some(Canned::Fail) => Err(api_client::Error::ApiError {
                code: "rate_limit_reached".into(),
                msg: "Too many requests".into(),
            }
            .into()),
            Some(Canned::Empty) | None => Ok(None),
        }
    }
}

/// Builds a dated table from chronological closes, newest row first as
/// MarketStack returns them.
fn dated_closes(prices: &[&str]) -> RawTable {
    let mut table = RawTable::new(vec!["date".into(), "close".into()]);
    for (i, price) in prices.iter().enumerate().rev() {
        table.push_row(vec![format!("2025-01-{:02}", i + 1), price.to_string()]);
    }
    table
}

fn tickers(symbols: &[&str]) -> Vec<Ticker> {
    symbols.iter().map(|s| Ticker::new(s).unwrap()).collect()
}

#[test]
fn thirty_closes_ending_low_classify_below() {
    let mut prices = vec!["10.0"; 29];
    prices.push("8.0");
    let source = StubSource::new().with("JET2.L", Canned::Table(dated_closes(&prices)));

    let pipeline = TickerPipeline::default();
    let analysis = pipeline
        .evaluate(&Ticker::new("JET2.L").unwrap(), &source)
        .unwrap();

    assert_eq!(analysis.record.latest_close, dec!(8.0));
    assert_eq!(analysis.record.latest_sma, Some(dec!(9.92)));
    assert_eq!(analysis.record.status, Status::Below);
    assert_eq!(analysis.series.len(), 30);
    assert_eq!(analysis.rolling.values.len(), 30);
    assert_eq!(analysis.rolling.latest(), Some(dec!(9.92)));
}

#[test]
fn twenty_four_points_is_insufficient_history() {
    let prices = vec!["£1,000.00"; 24];
    let source = StubSource::new().with("RWS.L", Canned::Table(dated_closes(&prices)));

    let analysis = TickerPipeline::default()
        .evaluate(&Ticker::new("RWS.L").unwrap(), &source)
        .unwrap();

    assert_eq!(analysis.record.latest_close, dec!(1000));
    assert_eq!(analysis.record.latest_sma, None);
    assert_eq!(analysis.record.status, Status::InsufficientHistory);
}

#[test]
fn each_failure_kind_becomes_one_error_record() {
    let mut no_column = RawTable::new(vec!["date".into(), "volume".into()]);
    no_column.push_row(vec!["2025-01-02".into(), "100".into()]);
    let mut unparsable = RawTable::new(vec!["Close".into()]);
    unparsable.push_row(vec!["n/a".into()]);

    let source = StubSource::new()
        .with("EMPTY", Canned::Empty)
        .with("NOCOL", Canned::Table(no_column))
        .with("JUNK", Canned::Table(unparsable))
        .with("FAIL", Canned::Fail);

    let pipeline = TickerPipeline::default();
    let mut aggregator = RunAggregator::new(chrono::Local::now());
    for ticker in tickers(&["EMPTY", "NOCOL", "JUNK", "FAIL"]) {
        assert!(pipeline.process(&ticker, &source, &mut aggregator).is_err());
    }

    let messages: Vec<&str> = aggregator.errors().iter().map(|e| e.error.as_str()).collect();
    assert_eq!(messages[0], "No data returned");
    assert!(messages[1].starts_with("No valid price column found"));
    assert!(messages[2].starts_with("No valid price values after cleaning"));
    assert!(messages[3].contains("Too many requests"));
    assert!(aggregator.summary().is_empty());
}

#[test]
fn one_failing_ticker_does_not_stop_the_batch() {
    let healthy = dated_closes(&vec!["5"; 25]);
    let source = StubSource::new()
        .with("A", Canned::Table(healthy.clone()))
        .with("B", Canned::Fail)
        .with("C", Canned::Table(healthy.clone()))
        .with("D", Canned::Table(healthy));

    let mut engine = Engine::new(TickerPipeline::default());
    let report = engine.run(&tickers(&["A", "B", "C", "D"]), &source);

    let summary: Vec<&str> = report.summary.iter().map(|r| r.ticker.as_str()).collect();
    assert_eq!(summary, vec!["A", "C", "D"]);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].ticker.as_str(), "B");
    assert!(report.summary.iter().all(|r| r.status == Status::AboveOrEqual));
}

#[test]
fn overflowing_prices_fail_only_their_ticker() {
    let healthy = dated_closes(&vec!["5"; 25]);
    let huge = dated_closes(&vec!["9,000,000,000,000,000,000,000,000,000"; 25]);
    let source = StubSource::new()
        .with("A", Canned::Table(healthy.clone()))
        .with("HUGE", Canned::Table(huge))
        .with("C", Canned::Table(healthy));

    let mut engine = Engine::new(TickerPipeline::default());
    let report = engine.run(&tickers(&["A", "HUGE", "C"]), &source);

    let summary: Vec<&str> = report.summary.iter().map(|r| r.ticker.as_str()).collect();
    assert_eq!(summary, vec!["A", "C"]);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].ticker.as_str(), "HUGE");
    assert_eq!(report.errors[0].error, "Price sum overflowed over a 25-point window");
    assert_eq!(report.processed(), 3);
}

#[derive(Clone, Default)]
struct Recorder {
    events: Rc<RefCell<Vec<String>>>,
}

impl RunObserver for Recorder {
    fn on_start(&mut self, tickers: &[Ticker], source: &str) {
        self.events.borrow_mut().push(format!("start {} {}", tickers.len(), source));
    }

    fn on_analysis(&mut self, analysis: &TickerAnalysis) {
        self.events
            .borrow_mut()
            .push(format!("ok {} {}", analysis.record.ticker, analysis.record.status));
    }

    fn on_error(&mut self, error: &ErrorRecord) {
        self.events.borrow_mut().push(format!("err {}", error.ticker));
    }

    fn on_finish(&mut self, report: &RunReport) {
        self.events
            .borrow_mut()
            .push(format!("finish {}", report.processed()));
    }
}

#[test]
fn observers_see_tickers_in_order() {
    let falling: Vec<String> = (0..25).map(|i| (100 - i).to_string()).collect();
    let falling: Vec<&str> = falling.iter().map(String::as_str).collect();
    let source = StubSource::new().with("DOWN", Canned::Table(dated_closes(&falling)));

    let recorder = Recorder::default();
    let mut engine = Engine::new(TickerPipeline::new(MovingAverageEngine::new(3).unwrap()));
    engine.add_observer(Box::new(recorder.clone()));
    let report = engine.run(&tickers(&["MISSING", "DOWN"]), &source);

    assert_eq!(
        *recorder.events.borrow(),
        vec![
            "start 2 Stub".to_string(),
            "err MISSING".to_string(),
            "ok DOWN BELOW".to_string(),
            "finish 2".to_string(),
        ]
    );
    assert_eq!(report.below_threshold.len(), 1);
    assert!(Rc::ptr_eq(&report.below_threshold[0], &report.summary[0]));
}
