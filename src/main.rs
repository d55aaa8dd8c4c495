use chrono::{Datelike, Local, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};
use tabled::{settings::Style, Table, Tabled};
use tracing_subscriber::EnvFilter;

use tienda::config::{
    config_dir, load_config, load_products, load_state, resolve_output_dir, save_state, State,
    CONFIG_TEMPLATE, PRODUCTS_TEMPLATE,
};
use tienda::error::{Result, StoreError};
use tienda::model::{
    sort_recent_first, Client, PaymentMethod, PaymentStatus, SalePayment, StaffMember,
};
use tienda::money::{format_currency, validate_amount, CurrencyFormat};
use tienda::ops::{self, NewCredit, NewPayment, NewSale};
use tienda::present::{FilePresenter, Presenter, StdoutPresenter};
use tienda::receipt;

#[derive(Parser)]
#[command(name = "tienda")]
#[command(version, about = "Store credits, sales and payment receipts", long_about = None)]
struct Cli {
    /// Path to config directory (default: XDG config dir)
    #[arg(short = 'C', long, global = true)]
    config_dir: Option<PathBuf>,

    /// Increase log output on stderr (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize config directory with template files
    Init,

    /// Show a summary of the store
    Status,

    /// List the product catalog
    Products,

    /// List known clients
    Clients,

    /// Add a client
    ClientAdd {
        #[arg(long)]
        name: String,

        #[arg(long)]
        phone: Option<String>,

        #[arg(long)]
        email: Option<String>,
    },

    /// List staff members and their commissions
    Staff,

    /// Add a staff member
    StaffAdd {
        /// Short code used with --staff
        #[arg(long)]
        code: String,

        #[arg(long)]
        name: String,

        /// Default commission percentage
        #[arg(long, default_value = "0")]
        commission: Decimal,
    },

    /// Show a staff member's sales history
    StaffShow {
        code: String,
    },

    /// Open a new credit for a client
    CreditNew {
        /// Client name
        #[arg(short, long)]
        client: String,

        /// Client phone
        #[arg(short, long)]
        phone: String,

        /// Products in format "product:quantity" (can be repeated)
        #[arg(short, long, value_name = "PRODUCT:QTY")]
        item: Vec<String>,

        /// Explicit credit code (default: next code from config)
        #[arg(long)]
        code: Option<String>,
    },

    /// List credits
    Credits {
        /// Filter by credit code or client name
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Show a credit with its products and payments
    CreditShow {
        /// Credit code, id or index from 'credits'
        credit: String,
    },

    /// Delete a credit
    CreditDelete {
        /// Credit code, id or index from 'credits'
        credit: String,
    },

    /// Record a payment against a credit
    Pay {
        /// Credit code, id or index from 'credits'
        credit: String,

        /// Payment amount
        amount: Decimal,

        /// cash, card or transfer
        #[arg(short, long, default_value = "cash")]
        method: PaymentMethod,

        /// Card authorization or transfer reference
        #[arg(short, long)]
        reference: Option<String>,

        /// Payment date (default: today)
        #[arg(long)]
        date: Option<String>,

        /// Write a receipt for the payment
        #[arg(long)]
        print: bool,

        /// Write the receipt and open it with the system viewer
        #[arg(long)]
        open: bool,
    },

    /// Cancel a payment (kept in history, no longer counted)
    PaymentCancel {
        credit: String,
        payment: String,
    },

    /// Delete a payment
    PaymentDelete {
        credit: String,
        payment: String,
    },

    /// Produce the receipt for a payment
    Receipt {
        credit: String,
        payment: String,

        /// Print the HTML to stdout instead of writing a file
        #[arg(long, conflicts_with = "json")]
        stdout: bool,

        /// Print the receipt fields as JSON
        #[arg(long)]
        json: bool,

        /// Open the written receipt with the system viewer
        #[arg(long)]
        open: bool,
    },

    /// Record a sale
    SaleNew {
        /// Client name (added to clients if new)
        #[arg(short, long)]
        client: String,

        #[arg(short, long)]
        phone: Option<String>,

        /// Products in format "product:quantity" (can be repeated)
        #[arg(short, long, value_name = "PRODUCT:QTY")]
        item: Vec<String>,

        /// cash, card or transfer
        #[arg(short, long)]
        method: Option<PaymentMethod>,

        #[arg(short, long, requires = "method")]
        reference: Option<String>,

        /// Staff code credited with the sale
        #[arg(long)]
        staff: Option<String>,

        /// Commission percentage (default: staff member's default)
        #[arg(long, requires = "staff")]
        commission: Option<Decimal>,

        #[arg(long)]
        notes: Option<String>,
    },

    /// List sales, newest first
    Sales {
        /// Number of sales to show (default: all)
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Delete a sale
    SaleDelete {
        sale: String,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "tienda=warn",
        1 => "tienda=info",
        _ => "tienda=debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let cfg_dir = match cli.config_dir {
        Some(p) => p,
        None => config_dir()?,
    };

    if !matches!(cli.command, Commands::Init) && !cfg_dir.exists() {
        return Err(StoreError::ConfigNotFound(cfg_dir));
    }

    match cli.command {
        Commands::Init => cmd_init(&cfg_dir),
        Commands::Status => cmd_status(&cfg_dir),
        Commands::Products => cmd_products(&cfg_dir),
        Commands::Clients => cmd_clients(&cfg_dir),
        Commands::ClientAdd { name, phone, email } => cmd_client_add(&cfg_dir, name, phone, email),
        Commands::Staff => cmd_staff(&cfg_dir),
        Commands::StaffAdd {
            code,
            name,
            commission,
        } => cmd_staff_add(&cfg_dir, code, name, commission),
        Commands::StaffShow { code } => cmd_staff_show(&cfg_dir, &code),
        Commands::CreditNew {
            client,
            phone,
            item,
            code,
        } => cmd_credit_new(&cfg_dir, client, phone, &item, code),
        Commands::Credits { search } => cmd_credits(&cfg_dir, search.as_deref()),
        Commands::CreditShow { credit } => cmd_credit_show(&cfg_dir, &credit),
        Commands::CreditDelete { credit } => cmd_credit_delete(&cfg_dir, &credit),
        Commands::Pay {
            credit,
            amount,
            method,
            reference,
            date,
            print,
            open,
        } => cmd_pay(
            &cfg_dir,
            &credit,
            NewPaymentArgs {
                amount,
                method,
                reference,
                date,
            },
            print || open,
            open,
        ),
        Commands::PaymentCancel { credit, payment } => {
            cmd_payment_cancel(&cfg_dir, &credit, &payment)
        }
        Commands::PaymentDelete { credit, payment } => {
            cmd_payment_delete(&cfg_dir, &credit, &payment)
        }
        Commands::Receipt {
            credit,
            payment,
            stdout,
            json,
            open,
        } => cmd_receipt(&cfg_dir, &credit, &payment, stdout, json, open),
        Commands::SaleNew {
            client,
            phone,
            item,
            method,
            reference,
            staff,
            commission,
            notes,
        } => cmd_sale_new(
            &cfg_dir,
            client,
            phone,
            &item,
            method.map(|method| SalePayment { method, reference }),
            staff.map(|code| (code, commission)),
            notes,
        ),
        Commands::Sales { limit } => cmd_sales(&cfg_dir, limit),
        Commands::SaleDelete { sale } => cmd_sale_delete(&cfg_dir, &sale),
    }
}

/// Initialize config directory with template files
fn cmd_init(cfg_dir: &Path) -> Result<()> {
    use std::fs;

    if cfg_dir.exists() {
        return Err(StoreError::AlreadyInitialized(cfg_dir.to_path_buf()));
    }

    fs::create_dir_all(cfg_dir)?;
    fs::create_dir_all(cfg_dir.join("receipts"))?;

    fs::write(cfg_dir.join("config.toml"), CONFIG_TEMPLATE)?;
    fs::write(cfg_dir.join("products.toml"), PRODUCTS_TEMPLATE)?;

    println!("Initialized store config at: {}", cfg_dir.display());
    println!();
    println!("Next steps:");
    println!(
        "  1. Edit your business details:  $EDITOR {}/config.toml",
        cfg_dir.display()
    );
    println!(
        "  2. Fill in your catalog:        $EDITOR {}/products.toml",
        cfg_dir.display()
    );
    println!("  3. Add staff:                   tienda staff-add --code <code> --name <name>");
    println!();
    println!("Then open your first credit:");
    println!("  tienda credit-new --client <name> --phone <phone> --item <product>:<quantity>");

    Ok(())
}

// Table row structs for tabled
#[derive(Tabled)]
struct ProductRow {
    #[tabled(rename = "CODE")]
    code: String,
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "PRICE")]
    price: String,
}

#[derive(Tabled)]
struct ClientRow {
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "PHONE")]
    phone: String,
    #[tabled(rename = "EMAIL")]
    email: String,
}

#[derive(Tabled)]
struct StaffRow {
    #[tabled(rename = "CODE")]
    code: String,
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "COMMISSION")]
    commission: String,
    #[tabled(rename = "SALES")]
    sales: usize,
    #[tabled(rename = "SOLD")]
    sold: String,
    #[tabled(rename = "EARNED")]
    earned: String,
}

#[derive(Tabled)]
struct StaffSaleRow {
    #[tabled(rename = "DATE")]
    date: String,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "AMOUNT")]
    amount: String,
    #[tabled(rename = "%")]
    commission: String,
    #[tabled(rename = "COMMISSION")]
    total: String,
}

#[derive(Tabled)]
struct CreditRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "CODE")]
    code: String,
    #[tabled(rename = "CLIENT")]
    client: String,
    #[tabled(rename = "TOTAL")]
    total: String,
    #[tabled(rename = "PAID")]
    paid: String,
    #[tabled(rename = "BALANCE")]
    balance: String,
    #[tabled(rename = "STATUS")]
    status: String,
}

#[derive(Tabled)]
struct ItemRow {
    #[tabled(rename = "PRODUCT")]
    name: String,
    #[tabled(rename = "QTY")]
    quantity: u32,
    #[tabled(rename = "PRICE")]
    price: String,
    #[tabled(rename = "SUBTOTAL")]
    subtotal: String,
}

#[derive(Tabled)]
struct PaymentRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "DATE")]
    date: String,
    #[tabled(rename = "METHOD")]
    method: String,
    #[tabled(rename = "REFERENCE")]
    reference: String,
    #[tabled(rename = "AMOUNT")]
    amount: String,
    #[tabled(rename = "STATUS")]
    status: String,
}

#[derive(Tabled)]
struct SaleRow {
    #[tabled(rename = "DATE")]
    date: String,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "CLIENT")]
    client: String,
    #[tabled(rename = "PAYMENT")]
    payment: String,
    #[tabled(rename = "STAFF")]
    staff: String,
    #[tabled(rename = "TOTAL")]
    total: String,
}

fn print_table<T: Tabled>(rows: Vec<T>) {
    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{table}");
}

fn parse_date(input: Option<String>) -> Result<NaiveDate> {
    match input {
        Some(s) => NaiveDate::parse_from_str(&s, "%Y-%m-%d").map_err(|_| StoreError::InvalidDate(s)),
        None => Ok(Local::now().date_naive()),
    }
}

/// Resolve a credit reference to its position in the state.
/// Accepts an id, a code, or an index (1-based, newest first) from 'credits'.
/// Ids and codes win so all-digit codes stay addressable.
fn resolve_credit(state: &State, reference: &str) -> Result<usize> {
    if let Some(i) = state.credit_index(reference) {
        return Ok(i);
    }

    match reference.parse::<usize>() {
        Ok(idx) if idx >= 1 && idx <= state.credits.len() => Ok(state.credits.len() - idx),
        Ok(_) => Err(StoreError::InvalidCreditIndex(reference.to_string())),
        Err(_) => Err(StoreError::CreditNotFound(reference.to_string())),
    }
}

/// Show a summary of the store
fn cmd_status(cfg_dir: &Path) -> Result<()> {
    let config = load_config(cfg_dir)?;
    let products = load_products(cfg_dir)?;
    let mut state = load_state(cfg_dir)?;
    let money = |amount| format_currency(amount, &config.currency);

    let outstanding: Decimal = state.credits.iter().map(|c| c.outstanding()).sum();
    let sold: Decimal = state.sales.iter().map(|s| s.total).sum();
    // preview only; the advanced counter is never saved here
    let next_code = ops::next_credit_code(&mut state, &config.credits, Local::now().year())
        .unwrap_or_else(|_| "(none free)".to_string());

    println!("Store Status");
    println!("{}", "-".repeat(50));
    println!("Config directory: {}", cfg_dir.display());
    println!("Business:         {}", config.business.name);
    println!("Products:         {}", products.len());
    println!("Clients:          {}", state.clients.len());
    println!("Staff:            {}", state.staff.len());
    println!("Credits:          {}", state.credits.len());
    println!("Outstanding:      {}", money(outstanding));
    println!("Sales:            {} ({})", state.sales.len(), money(sold));
    println!("Next credit:      {}", next_code);

    Ok(())
}

/// List the product catalog
fn cmd_products(cfg_dir: &Path) -> Result<()> {
    let config = load_config(cfg_dir)?;
    let products = load_products(cfg_dir)?;

    if products.is_empty() {
        println!("No products configured.");
        println!("Add products to: {}/products.toml", cfg_dir.display());
        return Ok(());
    }

    let rows: Vec<ProductRow> = products
        .iter()
        .map(|(code, product)| ProductRow {
            code: code.clone(),
            name: product.name.clone(),
            price: format_currency(product.price, &config.currency),
        })
        .collect();

    print_table(rows);
    Ok(())
}

/// List known clients
fn cmd_clients(cfg_dir: &Path) -> Result<()> {
    let state = load_state(cfg_dir)?;

    if state.clients.is_empty() {
        println!("No clients registered.");
        return Ok(());
    }

    let mut clients: Vec<_> = state.clients.iter().collect();
    clients.sort_by_key(|c| c.name.to_lowercase());

    let rows: Vec<ClientRow> = clients
        .iter()
        .map(|c| ClientRow {
            name: c.name.clone(),
            phone: c.phone.clone().unwrap_or_default(),
            email: c.email.clone().unwrap_or_default(),
        })
        .collect();

    print_table(rows);
    Ok(())
}

fn cmd_client_add(
    cfg_dir: &Path,
    name: String,
    phone: Option<String>,
    email: Option<String>,
) -> Result<()> {
    let mut state = load_state(cfg_dir)?;
    if state.find_client(&name).is_some() {
        return Err(StoreError::DuplicateClient(name));
    }

    state.clients.push(Client {
        name: name.clone(),
        phone,
        email,
    });
    save_state(cfg_dir, &state)?;

    println!("Added client {}", name);
    Ok(())
}

/// List staff members and their commissions
fn cmd_staff(cfg_dir: &Path) -> Result<()> {
    let config = load_config(cfg_dir)?;
    let state = load_state(cfg_dir)?;

    if state.staff.is_empty() {
        println!("No staff registered.");
        println!("Add one with: tienda staff-add --code <code> --name <name>");
        return Ok(());
    }

    let rows: Vec<StaffRow> = state
        .staff
        .iter()
        .map(|s| StaffRow {
            code: s.code.clone(),
            name: s.name.clone(),
            commission: format!("{}%", s.default_commission),
            sales: s.sales.len(),
            sold: format_currency(s.total_sold(), &config.currency),
            earned: format_currency(s.total_commission(), &config.currency),
        })
        .collect();

    print_table(rows);
    Ok(())
}

fn cmd_staff_add(cfg_dir: &Path, code: String, name: String, commission: Decimal) -> Result<()> {
    let commission = validate_amount(commission, "commission percentage")?;
    let mut state = load_state(cfg_dir)?;
    if state.staff_index(&code).is_some() {
        return Err(StoreError::DuplicateStaff(code));
    }

    println!("Added staff member {} ({}, {}% commission)", code, name, commission);
    state.staff.push(StaffMember {
        code,
        name,
        default_commission: commission,
        sales: Vec::new(),
    });
    save_state(cfg_dir, &state)?;

    Ok(())
}

/// Show a staff member's sales history
fn cmd_staff_show(cfg_dir: &Path, code: &str) -> Result<()> {
    let config = load_config(cfg_dir)?;
    let state = load_state(cfg_dir)?;
    let member = state
        .staff_index(code)
        .map(|i| &state.staff[i])
        .ok_or_else(|| StoreError::StaffNotFound(code.to_string()))?;
    let money = |amount| format_currency(amount, &config.currency);

    println!("{} ({})", member.name, member.code);

    if member.sales.is_empty() {
        println!("  No sales recorded.");
    } else {
        let rows: Vec<StaffSaleRow> = member
            .sales
            .iter()
            .map(|s| StaffSaleRow {
                date: s.date.with_timezone(&Local).format("%Y-%m-%d").to_string(),
                id: s.id.clone(),
                amount: money(s.amount),
                commission: format!("{}%", s.commission),
                total: money(s.total_commission),
            })
            .collect();
        print_table(rows);
    }

    println!(
        "Total sold: {}  Commission earned: {}",
        money(member.total_sold()),
        money(member.total_commission())
    );

    Ok(())
}

/// Open a new credit
fn cmd_credit_new(
    cfg_dir: &Path,
    client: String,
    phone: String,
    items: &[String],
    code: Option<String>,
) -> Result<()> {
    if items.is_empty() {
        return Err(StoreError::NoItems);
    }

    let config = load_config(cfg_dir)?;
    let products = load_products(cfg_dir)?;
    let mut state = load_state(cfg_dir)?;

    let items = ops::resolve_items(items, &products)?;
    let idx = ops::open_credit(
        &mut state,
        &config.credits,
        NewCredit {
            code,
            client_name: client,
            client_phone: phone,
            items,
        },
        Utc::now(),
    )?;
    let credit = state.credits[idx].clone();
    save_state(cfg_dir, &state)?;

    println!("Opened credit {}", credit.code);
    println!("  Client: {} ({})", credit.client_name, credit.client_phone);
    println!(
        "  Total:  {}",
        format_currency(credit.total_amount, &config.currency)
    );

    Ok(())
}

/// List credits, newest first
fn cmd_credits(cfg_dir: &Path, search: Option<&str>) -> Result<()> {
    let config = load_config(cfg_dir)?;
    let state = load_state(cfg_dir)?;
    let money = |amount| format_currency(amount, &config.currency);

    if state.credits.is_empty() {
        println!("No credits registered.");
        return Ok(());
    }

    // Index stays tied to the unfiltered listing so it can be reused in other commands
    let shown: Vec<_> = state
        .credits
        .iter()
        .rev()
        .enumerate()
        .filter(|(_, c)| search.map_or(true, |term| c.matches(term)))
        .collect();

    if shown.is_empty() {
        println!("No credits match '{}'.", search.unwrap_or_default());
        return Ok(());
    }

    let rows: Vec<CreditRow> = shown
        .iter()
        .map(|(idx, c)| CreditRow {
            index: idx + 1,
            code: c.code.clone(),
            client: c.client_name.clone(),
            total: money(c.total_amount),
            paid: money(c.paid_amount()),
            balance: money(c.outstanding()),
            status: c.status().to_string(),
        })
        .collect();

    let outstanding: Decimal = shown.iter().map(|(_, c)| c.outstanding()).sum();

    print_table(rows);
    println!();
    println!(
        "{} credit(s), outstanding {}",
        shown.len(),
        money(outstanding)
    );

    Ok(())
}

/// Show a credit with its products and payments
fn cmd_credit_show(cfg_dir: &Path, credit_ref: &str) -> Result<()> {
    let config = load_config(cfg_dir)?;
    let state = load_state(cfg_dir)?;
    let credit = &state.credits[resolve_credit(&state, credit_ref)?];
    let money = |amount| format_currency(amount, &config.currency);

    println!("Credit {} ({})", credit.code, credit.status());
    println!("  Client: {} ({})", credit.client_name, credit.client_phone);
    println!();

    let items: Vec<ItemRow> = credit
        .products
        .iter()
        .map(|p| ItemRow {
            name: p.name.clone(),
            quantity: p.quantity,
            price: money(p.price),
            subtotal: money(p.subtotal),
        })
        .collect();
    print_table(items);

    if credit.payments.is_empty() {
        println!("No payments recorded.");
    } else {
        let payments: Vec<PaymentRow> = credit
            .payments
            .iter()
            .map(|p| PaymentRow {
                id: p.id.clone(),
                date: p.date.to_string(),
                method: p.method.label().to_string(),
                reference: p.reference.clone().unwrap_or_default(),
                amount: money(p.amount),
                status: match p.status {
                    PaymentStatus::Active => "ACTIVE".to_string(),
                    PaymentStatus::Cancelled => "CANCELLED".to_string(),
                },
            })
            .collect();
        print_table(payments);
    }

    println!(
        "Total: {}  Paid: {}  Balance: {}",
        money(credit.total_amount),
        money(credit.paid_amount()),
        money(credit.outstanding())
    );

    Ok(())
}

fn cmd_credit_delete(cfg_dir: &Path, credit_ref: &str) -> Result<()> {
    let mut state = load_state(cfg_dir)?;
    let id = state.credits[resolve_credit(&state, credit_ref)?].id.clone();
    let removed = ops::delete_credit(&mut state, &id)?;
    save_state(cfg_dir, &state)?;

    println!("Deleted credit {} ({})", removed.code, removed.client_name);
    Ok(())
}

struct NewPaymentArgs {
    amount: Decimal,
    method: PaymentMethod,
    reference: Option<String>,
    date: Option<String>,
}

/// Record a payment against a credit
fn cmd_pay(
    cfg_dir: &Path,
    credit_ref: &str,
    args: NewPaymentArgs,
    print: bool,
    open: bool,
) -> Result<()> {
    let config = load_config(cfg_dir)?;
    let mut state = load_state(cfg_dir)?;
    let idx = resolve_credit(&state, credit_ref)?;
    let id = state.credits[idx].id.clone();
    let date = parse_date(args.date)?;

    let payment = ops::add_payment(
        &mut state,
        &id,
        NewPayment {
            amount: args.amount,
            date,
            method: args.method,
            reference: args.reference,
        },
        Utc::now(),
    )?;
    save_state(cfg_dir, &state)?;

    let credit = &state.credits[idx];
    let money = |amount| format_currency(amount, &config.currency);
    let outstanding = credit.outstanding();

    if outstanding.is_zero() {
        println!(
            "Recorded {} payment {} for {} (fully paid)",
            money(payment.amount),
            payment.id,
            credit.code
        );
    } else {
        println!(
            "Recorded {} payment {} for {} ({} remaining)",
            money(payment.amount),
            payment.id,
            credit.code,
            money(outstanding)
        );
    }

    if print {
        let document =
            receipt::render_with(credit, &payment, &config.business.name, &config.render_options());
        let presenter = FilePresenter::new(resolve_output_dir(&config.receipt.output_dir, cfg_dir))
            .with_open(open);
        presenter.show(&document, &config.business.name)?;
        println!("  Receipt: {}", presenter.path_for(&document).display());
    }

    Ok(())
}

fn cmd_payment_cancel(cfg_dir: &Path, credit_ref: &str, payment_ref: &str) -> Result<()> {
    let config = load_config(cfg_dir)?;
    let mut state = load_state(cfg_dir)?;
    let idx = resolve_credit(&state, credit_ref)?;
    let id = state.credits[idx].id.clone();
    let payment = ops::cancel_payment(&mut state, &id, payment_ref)?;
    save_state(cfg_dir, &state)?;

    println!(
        "Cancelled {} payment {} on {}",
        format_currency(payment.amount, &config.currency),
        payment.id,
        state.credits[idx].code
    );
    Ok(())
}

fn cmd_payment_delete(cfg_dir: &Path, credit_ref: &str, payment_ref: &str) -> Result<()> {
    let config = load_config(cfg_dir)?;
    let mut state = load_state(cfg_dir)?;
    let idx = resolve_credit(&state, credit_ref)?;
    let id = state.credits[idx].id.clone();
    let payment = ops::delete_payment(&mut state, &id, payment_ref)?;
    save_state(cfg_dir, &state)?;

    println!(
        "Deleted {} payment {} from {}",
        format_currency(payment.amount, &config.currency),
        payment.id,
        state.credits[idx].code
    );
    Ok(())
}

/// Produce the receipt for a payment
fn cmd_receipt(
    cfg_dir: &Path,
    credit_ref: &str,
    payment_ref: &str,
    stdout: bool,
    json: bool,
    open: bool,
) -> Result<()> {
    let config = load_config(cfg_dir)?;
    let state = load_state(cfg_dir)?;
    let credit = &state.credits[resolve_credit(&state, credit_ref)?];
    let payment = credit
        .find_payment(payment_ref)
        .ok_or_else(|| StoreError::PaymentNotFound {
            credit: credit.code.clone(),
            payment: payment_ref.to_string(),
        })?;
    let options = config.render_options();

    if json {
        let receipt = receipt::build(credit, payment, &config.business.name, &options);
        println!("{}", serde_json::to_string_pretty(&receipt)?);
        return Ok(());
    }

    let document = receipt::render_with(credit, payment, &config.business.name, &options);

    if stdout {
        return StdoutPresenter.show(&document, &config.business.name);
    }

    let presenter =
        FilePresenter::new(resolve_output_dir(&config.receipt.output_dir, cfg_dir)).with_open(open);
    presenter.show(&document, &config.business.name)?;
    println!("Saved receipt {}", presenter.path_for(&document).display());

    Ok(())
}

/// Record a sale
fn cmd_sale_new(
    cfg_dir: &Path,
    client: String,
    phone: Option<String>,
    items: &[String],
    payment: Option<SalePayment>,
    staff: Option<(String, Option<Decimal>)>,
    notes: Option<String>,
) -> Result<()> {
    if items.is_empty() {
        return Err(StoreError::NoItems);
    }

    let config = load_config(cfg_dir)?;
    let products = load_products(cfg_dir)?;
    let mut state = load_state(cfg_dir)?;

    let client = match state.find_client(&client) {
        Some(known) => known.clone(),
        None => Client {
            name: client,
            phone,
            email: None,
        },
    };

    let items = ops::resolve_items(items, &products)?;
    let recorded = ops::record_sale(
        &mut state,
        NewSale {
            client,
            items,
            payment,
            staff,
            notes,
        },
        Utc::now(),
    )?;
    save_state(cfg_dir, &state)?;

    let money = |amount| format_currency(amount, &config.currency);
    println!("Recorded sale {}", recorded.sale.id);
    println!("  Client: {}", recorded.sale.client.name);
    println!("  Total:  {}", money(recorded.sale.total));
    if recorded.new_client {
        println!("  Added {} to clients", recorded.sale.client.name);
    }
    if let (Some(staff), Some(record)) = (&recorded.sale.staff, &recorded.commission) {
        println!(
            "  Commission: {} to {} ({}%)",
            money(record.total_commission),
            staff.name,
            staff.commission
        );
    }

    Ok(())
}

fn describe_payment(payment: &Option<SalePayment>) -> String {
    match payment {
        Some(p) => match &p.reference {
            Some(reference) => format!("{} ({})", p.method.label(), reference),
            None => p.method.label().to_string(),
        },
        None => String::new(),
    }
}

/// List sales, newest first
fn cmd_sales(cfg_dir: &Path, limit: Option<usize>) -> Result<()> {
    let config = load_config(cfg_dir)?;
    let state = load_state(cfg_dir)?;
    let currency: &CurrencyFormat = &config.currency;

    if state.sales.is_empty() {
        println!("No sales recorded.");
        return Ok(());
    }

    let mut sales = state.sales.clone();
    sort_recent_first(&mut sales);
    let shown = match limit {
        Some(n) => &sales[..n.min(sales.len())],
        None => &sales[..],
    };

    let rows: Vec<SaleRow> = shown
        .iter()
        .map(|s| SaleRow {
            date: s.date.with_timezone(&Local).format("%Y-%m-%d").to_string(),
            id: s.id.clone(),
            client: s.client.name.clone(),
            payment: describe_payment(&s.payment),
            staff: s
                .staff
                .as_ref()
                .map(|st| format!("{} ({}% comisión)", st.name, st.commission))
                .unwrap_or_default(),
            total: format_currency(s.total, currency),
        })
        .collect();

    print_table(rows);

    for sale in shown.iter().filter(|s| s.notes.is_some()) {
        println!("Notes {}: {}", sale.id, sale.notes.as_deref().unwrap_or_default());
    }

    let total: Decimal = shown.iter().map(|s| s.total).sum();
    println!();
    println!(
        "{} sale(s) shown, {} total",
        shown.len(),
        format_currency(total, currency)
    );

    Ok(())
}

fn cmd_sale_delete(cfg_dir: &Path, sale_ref: &str) -> Result<()> {
    let mut state = load_state(cfg_dir)?;
    let removed = ops::delete_sale(&mut state, sale_ref)?;
    save_state(cfg_dir, &state)?;

    println!("Deleted sale {} ({})", removed.id, removed.client.name);
    Ok(())
}
