//! bonus-runner: headless runner for the KPI bonus engine.
//!
//! Usage:
//!   bonus-runner --mode bonus --input data/input/employees.json --date 2024-05-15
//!   bonus-runner --mode team --input data/input/team_months.json --salary 300000
//!   bonus-runner --mode forecast --input data/input/sa_targets.json --team Audit
//!   bonus-runner --mode distribute --total 1250
//!   bonus-runner --ipc-mode

use anyhow::{anyhow, Context, Result};
use chrono::{Local, NaiveDate};
use kpi_bonus_core::{
    bonus::{calculate_team_bonus, evaluate_all, evaluate_employee, BonusOutcome, EmployeeData},
    config::BonusConfig,
    distribution::distribute,
    forecast::{evaluate_forecast, ForecastOutcome, ForecastScope},
    sa_targets::SaTarget,
    seasonal::TeamMonthInput,
    validation::validate_team_months,
};
use serde::de::DeserializeOwned;
use std::env;
use std::io::{self, BufRead, Write};

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    CalculateBonus {
        employee: EmployeeData,
        #[serde(default)]
        date: Option<NaiveDate>,
    },
    TeamBonus {
        months: Vec<TeamMonthInput>,
        salary_pool: f64,
    },
    Forecast {
        targets: Vec<SaTarget>,
        #[serde(default)]
        team: Option<String>,
        #[serde(default)]
        date: Option<NaiveDate>,
    },
    Distribute {
        total: u64,
    },
    Quit,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let data_dir = string_arg(&args, "--data-dir").unwrap_or("./data");
    let mode = string_arg(&args, "--mode").unwrap_or("bonus");
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let json = args.iter().any(|a| a == "--json");
    let date = match string_arg(&args, "--date") {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .with_context(|| format!("--date expects YYYY-MM-DD, got {s}"))?,
        None => Local::now().date_naive(),
    };

    let config = BonusConfig::load(data_dir)?;

    if ipc_mode {
        return run_ipc_loop(&config, date);
    }

    match mode {
        "bonus" => run_bonus(&config, &args, date, json),
        "team" => run_team(&config, &args, json),
        "forecast" => run_forecast(&config, &args, date, json),
        "distribute" => run_distribute(&config, &args, json),
        other => Err(anyhow!("Unknown mode: {other} (expected bonus, team, forecast or distribute)")),
    }
}

fn run_bonus(config: &BonusConfig, args: &[String], date: NaiveDate, json: bool) -> Result<()> {
    let employees: Vec<EmployeeData> = read_input(args, "data/input/employees.json")?;
    let outcomes = evaluate_all(&employees, config, date)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcomes)?);
        return Ok(());
    }

    println!("=== BONUS SUMMARY ({date}) ===");
    for outcome in &outcomes {
        match outcome {
            BonusOutcome::Calculated(calc) => println!(
                "  {:<10} {} | Acc {:>6.2} | VAT {:>6.2} | SA {:>6.2} | Score {:>6.2} | Pool {:>10.2} | Bonus {:>10.2}",
                calc.employee_id,
                calc.fiscal_period,
                calc.accounts.total_points,
                calc.vat.total_points,
                calc.sa.total_points,
                calc.total_score,
                calc.quarterly_pool,
                calc.bonus_amount
            ),
            BonusOutcome::Rejected { employee_id, errors } => {
                println!("  {employee_id:<10} REJECTED");
                for e in errors {
                    println!("      - {e}");
                }
            }
        }
    }
    Ok(())
}

fn run_team(config: &BonusConfig, args: &[String], json: bool) -> Result<()> {
    let months: Vec<TeamMonthInput> = read_input(args, "data/input/team_months.json")?;
    let errors = validate_team_months(&months);
    if !errors.is_empty() {
        return Err(anyhow!("Invalid team months:\n  {}", errors.join("\n  ")));
    }

    let salary_pool = parse_arg(args, "--salary", 0.0f64);
    let team = calculate_team_bonus(
        &months,
        salary_pool,
        config.weights.bonus_pool_divisor,
        &config.seasonal_factors,
    )?;

    if json {
        println!("{}", serde_json::to_string_pretty(&team)?);
        return Ok(());
    }

    println!("=== TEAM DASHBOARD ===");
    for m in &team.months {
        println!(
            "  month {:>2} | base {:>6.2} | {:?} | x{:.2} | score {:>6.2}",
            m.month, m.base_points, m.branch, m.seasonal_factor, m.adjusted_points
        );
    }
    println!("  average score:  {:.2}", team.average_score);
    println!("  payout score:   {:.2}", team.payout_score);
    println!("  quarterly pool: {:.2}", team.quarterly_pool);
    println!("  bonus:          {:.2}", team.bonus_amount);
    Ok(())
}

fn run_forecast(config: &BonusConfig, args: &[String], date: NaiveDate, json: bool) -> Result<()> {
    let raw: Vec<SaTarget> = read_input(args, "data/input/sa_targets.json")?;
    let scope = match string_arg(args, "--team") {
        Some(team) => ForecastScope::Team(team.to_string()),
        None => ForecastScope::Organization,
    };
    let fc = match evaluate_forecast(&raw, date, &scope, config.season_end_month)? {
        ForecastOutcome::Forecast(fc) => fc,
        ForecastOutcome::Rejected { errors } => {
            return Err(anyhow!("Invalid SA targets:\n  {}", errors.join("\n  ")));
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&fc)?);
        return Ok(());
    }

    println!("=== SA FORECAST ({scope:?}, {date}) ===");
    println!("  completed:        {}/{}", fc.completed_jobs, fc.total_jobs);
    println!("  monthly rate:     {:.1}", fc.avg_monthly_rate);
    println!("  months remaining: {}", fc.months_remaining);
    println!("  forecast:         {:.1}%", fc.forecasted_completion);
    println!("  on track:         {}", fc.is_on_track);
    println!("  required rate:    {}", fc.required_monthly_rate);
    println!("  shortfall:        {}", fc.projected_shortfall);
    for p in &fc.projection {
        println!("    {:<10} {}", p.month, p.projected_jobs);
    }
    Ok(())
}

fn run_distribute(config: &BonusConfig, args: &[String], json: bool) -> Result<()> {
    let total = parse_arg(args, "--total", 0u64);
    let shares = distribute(total, &config.teams)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&shares)?);
        return Ok(());
    }

    println!("=== DISTRIBUTION OF {total} ===");
    for (team, share) in &shares {
        println!("  {team:<12} {share}");
    }
    Ok(())
}

fn run_ipc_loop(config: &BonusConfig, default_date: NaiveDate) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                writeln!(stdout, "{}", serde_json::json!({ "error": e.to_string() }))?;
                stdout.flush()?;
                continue;
            }
        };

        if matches!(cmd, IpcCommand::Quit) {
            break;
        }

        let response = match handle_command(config, cmd, default_date) {
            Ok(value) => value,
            Err(e) => serde_json::json!({ "error": e.to_string() }),
        };
        writeln!(stdout, "{response}")?;
        stdout.flush()?;
    }
    Ok(())
}

fn handle_command(
    config: &BonusConfig,
    cmd: IpcCommand,
    default_date: NaiveDate,
) -> Result<serde_json::Value> {
    let value = match cmd {
        IpcCommand::CalculateBonus { employee, date } => {
            let outcome = evaluate_employee(&employee, config, date.unwrap_or(default_date))?;
            serde_json::to_value(outcome)?
        }
        IpcCommand::TeamBonus { months, salary_pool } => {
            let errors = validate_team_months(&months);
            if !errors.is_empty() {
                return Ok(serde_json::json!({ "errors": errors }));
            }
            let team = calculate_team_bonus(
                &months,
                salary_pool,
                config.weights.bonus_pool_divisor,
                &config.seasonal_factors,
            )?;
            serde_json::to_value(team)?
        }
        IpcCommand::Forecast { targets, team, date } => {
            let scope = team.map(ForecastScope::Team).unwrap_or(ForecastScope::Organization);
            match evaluate_forecast(&targets, date.unwrap_or(default_date), &scope, config.season_end_month)? {
                ForecastOutcome::Forecast(fc) => serde_json::to_value(fc)?,
                ForecastOutcome::Rejected { errors } => serde_json::json!({ "errors": errors }),
            }
        }
        IpcCommand::Distribute { total } => serde_json::to_value(distribute(total, &config.teams)?)?,
        IpcCommand::Quit => serde_json::Value::Null,
    };
    Ok(value)
}

fn read_input<T: DeserializeOwned>(args: &[String], default_path: &str) -> Result<T> {
    let path = string_arg(args, "--input").unwrap_or(default_path);
    let content = std::fs::read_to_string(path).map_err(|e| anyhow!("Cannot read {path}: {e}"))?;
    Ok(serde_json::from_str(&content)?)
}

fn string_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
