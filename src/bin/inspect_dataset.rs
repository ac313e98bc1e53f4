// Print what the dataset holds as JSON.
//
//     inspect_dataset reports
//     inspect_dataset cuts REPORT
//     inspect_dataset items REPORT CUT_TYPE
//     inspect_dataset query REPORT CUT_TYPE ITEM [FROM] [TO]

use anyhow::{bail, Context, Result};
use beefscraper::{
    config::Config,
    dataset::{DatasetCache, DatasetStore, Query},
};
use chrono::NaiveDate;
use serde_json::json;
use std::{env, process::exit};

const USAGE: &str = "usage: inspect_dataset <reports | cuts REPORT | items REPORT CUT_TYPE | query REPORT CUT_TYPE ITEM [FROM] [TO]>";

fn date_arg(raw: Option<&String>) -> Result<Option<NaiveDate>> {
    raw.map(|s| {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").with_context(|| format!("bad date {s:?}, want YYYY-MM-DD"))
    })
    .transpose()
}

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();
    if let Err(e) = run(&args) {
        eprintln!("Error: {e:#}");
        exit(1);
    }
}

fn run(args: &[String]) -> Result<()> {
    let cfg = Config::load()?;
    let store = DatasetStore::new(&cfg.dataset_path);
    let dataset = DatasetCache::new().get_or_load(&store)?;

    let arg = |i: usize| args.get(i).map(String::as_str);
    let out = match (arg(0), arg(1), arg(2), arg(3)) {
        (Some("reports"), ..) => json!(dataset.reports()),
        (Some("cuts"), Some(report), ..) => json!(dataset.cut_types(report)),
        (Some("items"), Some(report), Some(cut), _) => json!(dataset.items(report, cut)),
        (Some("query"), Some(report), Some(cut), Some(item)) => {
            let mut q = Query::new().report(report).cut_type(cut).item(item);
            q.from = date_arg(args.get(4))?;
            q.to = date_arg(args.get(5))?;
            json!({
                "query": q,
                "rows": dataset.query(&q),
                "summary": dataset.summarize(&q),
            })
        }
        _ => bail!(USAGE),
    };

    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
