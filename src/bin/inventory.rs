use std::{path::PathBuf, sync::Arc};

use anyhow::{anyhow, bail, Context, Result};
use chrono::{Duration, NaiveDate};
use clap::{ArgAction, Args, Parser, Subcommand};
use inventory_ledger::{
    clock::SystemClock,
    config::{self, AppConfig},
    models::{
        Category, CategoryInput, Movement, MovementType, NewMovement, Product, ProductInput,
        Supplier, SupplierInput,
    },
    repositories::Snapshot,
    services::{
        export,
        ledger::{self, MovementFilter},
        reports::{self, ProductFilter, StockLevelFilter},
        InventoryService,
    },
};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut context = CliContext::initialize(cli.data_dir.clone())?;

    match cli.command {
        Commands::Products(command) => handle_products_command(&mut context, command, cli.json)?,
        Commands::Categories(command) => {
            handle_categories_command(&mut context, command, cli.json)?
        }
        Commands::Suppliers(command) => handle_suppliers_command(&mut context, command, cli.json)?,
        Commands::Movements(command) => handle_movements_command(&mut context, command, cli.json)?,
        Commands::Reports(command) => handle_reports_command(&context, command, cli.json)?,
        Commands::Export(command) => handle_export_command(&context, command, cli.json)?,
        Commands::Seed(command) => handle_seed_command(&mut context, command, cli.json)?,
    }

    Ok(())
}

#[derive(Parser)]
#[command(name = "inventory", about = "Local inventory tracker with a stock movement ledger", version)]
struct Cli {
    #[arg(
        long,
        global = true,
        action = ArgAction::SetTrue,
        help = "Render command output as pretty JSON"
    )]
    json: bool,
    #[arg(
        long,
        global = true,
        help = "Directory holding the persisted containers; overrides configuration"
    )]
    data_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(subcommand)]
    Products(ProductsCommands),
    #[command(subcommand)]
    Categories(CategoriesCommands),
    #[command(subcommand)]
    Suppliers(SuppliersCommands),
    #[command(subcommand)]
    Movements(MovementsCommands),
    #[command(subcommand)]
    Reports(ReportsCommands),
    #[command(subcommand)]
    Export(ExportCommands),
    #[command(subcommand)]
    Seed(SeedCommands),
}

#[derive(Subcommand)]
enum ProductsCommands {
    List(ListProductsArgs),
    Show(IdArgs),
    Add(AddProductArgs),
    Update(UpdateProductArgs),
    Delete(IdArgs),
}

#[derive(Args)]
struct IdArgs {
    #[arg(help = "Record identifier")]
    id: String,
}

#[derive(Args)]
struct ListProductsArgs {
    #[arg(long, help = "Case-insensitive match on name or SKU")]
    search: Option<String>,
    #[arg(long, help = "Only products in this category id")]
    category: Option<String>,
    #[arg(long, help = "Stock level: in, low or out")]
    stock: Option<StockLevelFilter>,
}

#[derive(Args)]
struct AddProductArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    sku: String,
    #[arg(long, help = "Category id")]
    category: String,
    #[arg(long, help = "Supplier id")]
    supplier: String,
    #[arg(long)]
    price: Decimal,
    #[arg(long, default_value_t = 0)]
    stock: u32,
    #[arg(long, default_value_t = 0)]
    min_stock: u32,
    #[arg(long, default_value = "")]
    description: String,
    #[arg(long, default_value = "")]
    location: String,
}

#[derive(Args)]
struct UpdateProductArgs {
    id: String,
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    sku: Option<String>,
    #[arg(long)]
    category: Option<String>,
    #[arg(long)]
    supplier: Option<String>,
    #[arg(long)]
    price: Option<Decimal>,
    #[arg(long, help = "Overwrite the stock level directly, bypassing the ledger")]
    stock: Option<u32>,
    #[arg(long)]
    min_stock: Option<u32>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    location: Option<String>,
}

#[derive(Subcommand)]
enum CategoriesCommands {
    List,
    Add(AddCategoryArgs),
    Update(UpdateCategoryArgs),
    Delete(IdArgs),
}

#[derive(Args)]
struct AddCategoryArgs {
    #[arg(long)]
    name: String,
    #[arg(long, default_value = "")]
    description: String,
}

#[derive(Args)]
struct UpdateCategoryArgs {
    id: String,
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    description: Option<String>,
}

#[derive(Subcommand)]
enum SuppliersCommands {
    List,
    Add(AddSupplierArgs),
    Update(UpdateSupplierArgs),
    Delete(IdArgs),
}

#[derive(Args)]
struct AddSupplierArgs {
    #[arg(long)]
    name: String,
    #[arg(long, default_value = "", help = "Contact person")]
    contact: String,
    #[arg(long, default_value = "")]
    email: String,
    #[arg(long, default_value = "")]
    phone: String,
    #[arg(long, default_value = "")]
    address: String,
}

#[derive(Args)]
struct UpdateSupplierArgs {
    id: String,
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    contact: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    address: Option<String>,
}

#[derive(Subcommand)]
enum MovementsCommands {
    List(ListMovementsArgs),
    Record(RecordMovementArgs),
}

#[derive(Args)]
struct ListMovementsArgs {
    #[arg(long, help = "Case-insensitive match on product name or SKU")]
    search: Option<String>,
    #[arg(long = "type", help = "Movement type: in or out")]
    movement_type: Option<MovementType>,
    #[arg(long, help = "Only movements of this product id")]
    product: Option<String>,
    #[arg(long, help = "Show at most this many movements")]
    limit: Option<usize>,
}

#[derive(Args)]
struct RecordMovementArgs {
    #[arg(long, help = "Product id")]
    product: String,
    #[arg(long = "type", help = "Movement type: in or out")]
    movement_type: MovementType,
    #[arg(long)]
    quantity: u32,
    #[arg(long, default_value = "")]
    reason: String,
    #[arg(long, default_value = "")]
    notes: String,
    #[arg(long, help = "Acting user id; defaults to the configured user")]
    user: Option<String>,
}

#[derive(Subcommand)]
enum ReportsCommands {
    Summary,
    Categories,
    Trend(TrendArgs),
    LowStock(LowStockArgs),
    Movements(MovementReportArgs),
}

#[derive(Args)]
struct TrendArgs {
    #[arg(
        long,
        value_parser = parse_trend_days,
        help = "Number of days ending today (1-366); defaults to configuration"
    )]
    days: Option<u32>,
}

#[derive(Args)]
struct LowStockArgs {
    #[arg(long, help = "Only products in this category id")]
    category: Option<String>,
}

#[derive(Args)]
struct MovementReportArgs {
    #[arg(long, help = "First day, YYYY-MM-DD")]
    from: Option<NaiveDate>,
    #[arg(long, help = "Last day, YYYY-MM-DD; defaults to today")]
    to: Option<NaiveDate>,
}

#[derive(Subcommand)]
enum ExportCommands {
    Csv(ExportCsvArgs),
}

#[derive(Args)]
struct ExportCsvArgs {
    #[arg(long, help = "Write to this file instead of the default name")]
    output: Option<PathBuf>,
    #[arg(long, default_value = ".", help = "Directory for the default file name")]
    dir: PathBuf,
    #[arg(long, action = ArgAction::SetTrue, help = "Write the CSV to stdout")]
    stdout: bool,
}

#[derive(Subcommand)]
enum SeedCommands {
    Reset,
}

struct CliContext {
    config: AppConfig,
    service: InventoryService,
}

impl CliContext {
    fn initialize(data_dir: Option<PathBuf>) -> Result<Self> {
        let mut config = config::load_config().context("failed to load application config")?;
        if let Some(dir) = data_dir {
            config.data_dir = dir;
        }
        config::init_tracing(config.log_level(), config.log_json);

        let (service, report) = InventoryService::open(&config, Arc::new(SystemClock))
            .context("failed to open inventory store")?;
        if !report.seeded.is_empty() {
            debug!(containers = ?report.seeded, "seeded missing containers");
        }
        for issue in &report.issues {
            eprintln!("Warning: {}; reset to seed data", issue);
        }

        Ok(Self { config, service })
    }

    fn snapshot(&self) -> Snapshot<'_> {
        self.service.snapshot()
    }
}

fn handle_products_command(
    context: &mut CliContext,
    command: ProductsCommands,
    json: bool,
) -> Result<()> {
    match command {
        ProductsCommands::List(args) => {
            let filter = ProductFilter {
                search: args.search,
                category_id: args.category,
                stock_level: args.stock,
            };
            let snapshot = context.snapshot();
            let products = reports::filter_products(snapshot.products, &filter);
            if json {
                print_json(&products)?;
            } else if products.is_empty() {
                println!("No products found");
            } else {
                println!("Products ({} total):", products.len());
                for product in products {
                    render_product_line(&snapshot, product);
                }
            }
            Ok(())
        }
        ProductsCommands::Show(args) => {
            let snapshot = context.snapshot();
            let product = snapshot
                .product(&args.id)
                .ok_or_else(|| anyhow!("product {} not found", args.id))?;
            let mut history = ledger::movements_for_product(snapshot.movements, &product.id);
            history.sort_by(|a, b| b.date.cmp(&a.date));
            if json {
                print_json(&ProductDetail {
                    product,
                    category: reports::category_name(&snapshot, &product.category_id),
                    supplier: reports::supplier_name(&snapshot, &product.supplier_id),
                    status: product.stock_status().to_string(),
                    total_value: reports::stock_value(product)?,
                    movements: history,
                })?;
            } else {
                render_product(&snapshot, product);
                if history.is_empty() {
                    println!("  No movements recorded");
                } else {
                    println!("  Movements:");
                    for movement in history {
                        render_movement(&snapshot, movement);
                    }
                }
            }
            Ok(())
        }
        ProductsCommands::Add(args) => {
            let input = ProductInput {
                name: args.name,
                description: args.description,
                sku: args.sku,
                category_id: args.category,
                supplier_id: args.supplier,
                price: args.price,
                stock: args.stock,
                min_stock: args.min_stock,
                location: args.location,
            };
            let product = context
                .service
                .create_product(input)
                .context("failed to create product")?;
            if json {
                print_json(&product)?;
            } else {
                println!("Created product {} ({})", product.id, product.name);
            }
            Ok(())
        }
        ProductsCommands::Update(args) => {
            let existing = context
                .service
                .store()
                .product(&args.id)
                .ok_or_else(|| anyhow!("product {} not found", args.id))?;
            let mut input = ProductInput::from(existing);
            if let Some(name) = args.name {
                input.name = name;
            }
            if let Some(sku) = args.sku {
                input.sku = sku;
            }
            if let Some(category) = args.category {
                input.category_id = category;
            }
            if let Some(supplier) = args.supplier {
                input.supplier_id = supplier;
            }
            if let Some(price) = args.price {
                input.price = price;
            }
            if let Some(stock) = args.stock {
                input.stock = stock;
            }
            if let Some(min_stock) = args.min_stock {
                input.min_stock = min_stock;
            }
            if let Some(description) = args.description {
                input.description = description;
            }
            if let Some(location) = args.location {
                input.location = location;
            }
            let product = context
                .service
                .update_product(&args.id, input)
                .with_context(|| format!("failed to update product {}", args.id))?;
            if json {
                print_json(&product)?;
            } else {
                println!("Updated product {} ({})", product.id, product.name);
            }
            Ok(())
        }
        ProductsCommands::Delete(args) => {
            if !context.service.delete_product(&args.id)? {
                bail!("product {} not found", args.id);
            }
            if json {
                print_json(&Deleted { id: &args.id })?;
            } else {
                println!("Deleted product {}", args.id);
            }
            Ok(())
        }
    }
}

fn handle_categories_command(
    context: &mut CliContext,
    command: CategoriesCommands,
    json: bool,
) -> Result<()> {
    match command {
        CategoriesCommands::List => {
            let snapshot = context.snapshot();
            if json {
                print_json(&snapshot.categories)?;
            } else {
                for category in snapshot.categories {
                    render_category(&snapshot, category);
                }
            }
            Ok(())
        }
        CategoriesCommands::Add(args) => {
            let category = context
                .service
                .create_category(CategoryInput {
                    name: args.name,
                    description: args.description,
                })
                .context("failed to create category")?;
            if json {
                print_json(&category)?;
            } else {
                println!("Created category {} ({})", category.id, category.name);
            }
            Ok(())
        }
        CategoriesCommands::Update(args) => {
            let existing = context
                .service
                .store()
                .category(&args.id)
                .ok_or_else(|| anyhow!("category {} not found", args.id))?;
            let input = CategoryInput {
                name: args.name.unwrap_or_else(|| existing.name.clone()),
                description: args
                    .description
                    .unwrap_or_else(|| existing.description.clone()),
            };
            let category = context
                .service
                .update_category(&args.id, input)
                .with_context(|| format!("failed to update category {}", args.id))?;
            if json {
                print_json(&category)?;
            } else {
                println!("Updated category {} ({})", category.id, category.name);
            }
            Ok(())
        }
        CategoriesCommands::Delete(args) => {
            if !context.service.delete_category(&args.id)? {
                bail!("category {} not found", args.id);
            }
            if json {
                print_json(&Deleted { id: &args.id })?;
            } else {
                println!("Deleted category {}", args.id);
            }
            Ok(())
        }
    }
}

fn handle_suppliers_command(
    context: &mut CliContext,
    command: SuppliersCommands,
    json: bool,
) -> Result<()> {
    match command {
        SuppliersCommands::List => {
            let snapshot = context.snapshot();
            if json {
                print_json(&snapshot.suppliers)?;
            } else {
                for supplier in snapshot.suppliers {
                    render_supplier(supplier);
                }
            }
            Ok(())
        }
        SuppliersCommands::Add(args) => {
            let supplier = context
                .service
                .create_supplier(SupplierInput {
                    name: args.name,
                    contact: args.contact,
                    email: args.email,
                    phone: args.phone,
                    address: args.address,
                })
                .context("failed to create supplier")?;
            if json {
                print_json(&supplier)?;
            } else {
                println!("Created supplier {} ({})", supplier.id, supplier.name);
            }
            Ok(())
        }
        SuppliersCommands::Update(args) => {
            let existing = context
                .service
                .store()
                .supplier(&args.id)
                .ok_or_else(|| anyhow!("supplier {} not found", args.id))?;
            let input = SupplierInput {
                name: args.name.unwrap_or_else(|| existing.name.clone()),
                contact: args.contact.unwrap_or_else(|| existing.contact.clone()),
                email: args.email.unwrap_or_else(|| existing.email.clone()),
                phone: args.phone.unwrap_or_else(|| existing.phone.clone()),
                address: args.address.unwrap_or_else(|| existing.address.clone()),
            };
            let supplier = context
                .service
                .update_supplier(&args.id, input)
                .with_context(|| format!("failed to update supplier {}", args.id))?;
            if json {
                print_json(&supplier)?;
            } else {
                println!("Updated supplier {} ({})", supplier.id, supplier.name);
            }
            Ok(())
        }
        SuppliersCommands::Delete(args) => {
            if !context.service.delete_supplier(&args.id)? {
                bail!("supplier {} not found", args.id);
            }
            if json {
                print_json(&Deleted { id: &args.id })?;
            } else {
                println!("Deleted supplier {}", args.id);
            }
            Ok(())
        }
    }
}

fn handle_movements_command(
    context: &mut CliContext,
    command: MovementsCommands,
    json: bool,
) -> Result<()> {
    match command {
        MovementsCommands::List(args) => {
            let filter = MovementFilter {
                search: args.search,
                movement_type: args.movement_type,
                product_id: args.product,
            };
            let snapshot = context.snapshot();
            let mut movements = ledger::filter_movements(&snapshot, &filter);
            if let Some(limit) = args.limit {
                movements.truncate(limit);
            }
            if json {
                print_json(&movements)?;
            } else if movements.is_empty() {
                println!("No movements found");
            } else {
                let totals = ledger::totals(movements.iter().copied());
                println!(
                    "Movements ({} shown, +{} / -{}):",
                    totals.count, totals.total_in, totals.total_out
                );
                for movement in movements {
                    render_movement(&snapshot, movement);
                }
            }
            Ok(())
        }
        MovementsCommands::Record(args) => {
            let user = args
                .user
                .unwrap_or_else(|| context.config.default_user_id.clone());
            let input = NewMovement::new(args.product, args.movement_type, args.quantity)
                .with_reason(args.reason)
                .with_notes(args.notes);
            let outcome = context
                .service
                .record_movement(input, &user)
                .context("failed to record movement")?;
            if json {
                print_json(&outcome)?;
            } else {
                let movement = &outcome.movement;
                match outcome.stock_change {
                    Some(change) => println!(
                        "Recorded {} of {} for product {}: stock {} -> {}",
                        movement.movement_type.label(),
                        movement.quantity,
                        movement.product_id,
                        change.previous,
                        change.current
                    ),
                    None => println!(
                        "Recorded {} of {} for unknown product {}; no stock changed",
                        movement.movement_type.label(),
                        movement.quantity,
                        movement.product_id
                    ),
                }
            }
            Ok(())
        }
    }
}

fn handle_reports_command(context: &CliContext, command: ReportsCommands, json: bool) -> Result<()> {
    let snapshot = context.snapshot();
    let today = context.service.clock().today();
    match command {
        ReportsCommands::Summary => {
            let summary =
                reports::dashboard_summary(&snapshot, context.config.recent_movements_limit)?;
            if json {
                print_json(&summary)?;
            } else {
                println!("Total products:    {}", summary.total_products);
                println!("Total stock value: ${:.2}", summary.total_value);
                println!("Low stock:         {}", summary.low_stock_count);
                println!("Out of stock:      {}", summary.out_of_stock_count);
                println!(
                    "Stock levels:      in stock {}, low {}, out {}",
                    summary.distribution.in_stock,
                    summary.distribution.low_stock,
                    summary.distribution.out_of_stock
                );
                println!("Recent movements:");
                for movement in summary.recent_movements {
                    render_movement(&snapshot, movement);
                }
            }
        }
        ReportsCommands::Categories => {
            let rollups = reports::category_rollups(&snapshot)?;
            if json {
                print_json(&rollups)?;
            } else {
                for rollup in rollups {
                    println!(
                        "{:<20} products {:>3}  stock {:>6}  value ${:>10.2}  low {}",
                        rollup.category_name.as_deref().unwrap_or("(no category)"),
                        rollup.product_count,
                        rollup.total_stock,
                        rollup.total_value,
                        rollup.low_stock_count
                    );
                }
            }
        }
        ReportsCommands::Trend(args) => {
            let days = args.days.unwrap_or(context.config.trend_window_days);
            let trend = reports::daily_trend(snapshot.movements, today, days)?;
            if json {
                print_json(&trend)?;
            } else {
                for point in trend {
                    println!(
                        "{:<7} in {:>5}  out {:>5}  net {:>6}",
                        point.label, point.stock_in, point.stock_out, point.net
                    );
                }
            }
        }
        ReportsCommands::LowStock(args) => {
            let products = reports::low_stock(snapshot.products, args.category.as_deref());
            if json {
                print_json(&products)?;
            } else if products.is_empty() {
                println!("All products are above their minimum stock");
            } else {
                for product in products {
                    render_product_line(&snapshot, product);
                }
            }
        }
        ReportsCommands::Movements(args) => {
            let to = args.to.unwrap_or(today);
            let from = args
                .from
                .unwrap_or(to - Duration::days(i64::from(context.config.report_range_days)));
            let report = reports::movement_report(&snapshot, from, to);
            if json {
                print_json(&report)?;
            } else {
                println!(
                    "{} to {}: {} movements, in {}, out {}, net {}",
                    report.from,
                    report.to,
                    report.totals.count,
                    report.totals.total_in,
                    report.totals.total_out,
                    report.totals.net
                );
                for movement in report.movements {
                    render_movement(&snapshot, movement);
                }
            }
        }
    }
    Ok(())
}

fn handle_export_command(context: &CliContext, command: ExportCommands, json: bool) -> Result<()> {
    match command {
        ExportCommands::Csv(args) => {
            let snapshot = context.snapshot();
            if args.stdout {
                print!("{}", export::to_csv_string(&snapshot)?);
                return Ok(());
            }
            let path = match args.output {
                Some(path) => {
                    export::write_to_path(&snapshot, &path)?;
                    path
                }
                None => export::export_to_dir(&snapshot, &args.dir, context.service.clock().today())?,
            };
            if json {
                print_json(&Exported {
                    path: path.display().to_string(),
                    rows: snapshot.products.len(),
                })?;
            } else {
                println!("Exported {} products to {}", snapshot.products.len(), path.display());
            }
            Ok(())
        }
    }
}

fn handle_seed_command(context: &mut CliContext, command: SeedCommands, json: bool) -> Result<()> {
    match command {
        SeedCommands::Reset => {
            context
                .service
                .reset_to_seed()
                .context("failed to reset to seed data")?;
            let snapshot = context.snapshot();
            if json {
                print_json(&serde_json::json!({
                    "products": snapshot.products.len(),
                    "categories": snapshot.categories.len(),
                    "suppliers": snapshot.suppliers.len(),
                    "movements": snapshot.movements.len(),
                }))?;
            } else {
                println!(
                    "Reset to seed data: {} products, {} categories, {} suppliers, {} movements",
                    snapshot.products.len(),
                    snapshot.categories.len(),
                    snapshot.suppliers.len(),
                    snapshot.movements.len()
                );
            }
            Ok(())
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProductDetail<'a> {
    #[serde(flatten)]
    product: &'a Product,
    category: &'a str,
    supplier: &'a str,
    status: String,
    total_value: Decimal,
    movements: Vec<&'a Movement>,
}

#[derive(Serialize)]
struct Deleted<'a> {
    id: &'a str,
}

#[derive(Serialize)]
struct Exported {
    path: String,
    rows: usize,
}

fn parse_trend_days(raw: &str) -> Result<u32, String> {
    let value: u32 = raw
        .parse()
        .map_err(|_| format!("invalid integer '{raw}'"))?;
    if (1..=reports::MAX_TREND_DAYS).contains(&value) {
        Ok(value)
    } else {
        Err(format!(
            "days must be between 1 and {}",
            reports::MAX_TREND_DAYS
        ))
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn render_product_line(snapshot: &Snapshot<'_>, product: &Product) {
    println!(
        "- [{}] {} ({}) | {} | stock {} / min {} | ${:.2} | {}",
        product.id,
        product.name,
        product.sku,
        reports::category_name(snapshot, &product.category_id),
        product.stock,
        product.min_stock,
        product.price,
        product.stock_status()
    );
}

fn render_product(snapshot: &Snapshot<'_>, product: &Product) {
    println!("Product {} ({})", product.name, product.id);
    println!("  SKU: {}", product.sku);
    if !product.description.is_empty() {
        println!("  Description: {}", product.description);
    }
    println!(
        "  Category: {}",
        reports::category_name(snapshot, &product.category_id)
    );
    println!(
        "  Supplier: {}",
        reports::supplier_name(snapshot, &product.supplier_id)
    );
    println!("  Price: ${:.2}", product.price);
    println!(
        "  Stock: {} (min {}) - {}",
        product.stock,
        product.min_stock,
        product.stock_status()
    );
    match product.total_value() {
        Some(value) => println!("  Total value: ${:.2}", value),
        None => println!("  Total value: out of range"),
    }
    if !product.location.is_empty() {
        println!("  Location: {}", product.location);
    }
    println!("  Updated: {}", product.updated_at.to_rfc3339());
}

fn render_movement(snapshot: &Snapshot<'_>, movement: &Movement) {
    let sign = match movement.movement_type {
        MovementType::In => '+',
        MovementType::Out => '-',
    };
    println!(
        "  {}  {}{:<5} {} ({}) {} by {}",
        movement.date.format("%Y-%m-%d %H:%M"),
        sign,
        movement.quantity,
        reports::product_name(snapshot, &movement.product_id),
        reports::product_sku(snapshot, &movement.product_id),
        if movement.reason.is_empty() {
            movement.movement_type.label()
        } else {
            movement.reason.as_str()
        },
        movement.user_id
    );
}

fn render_category(snapshot: &Snapshot<'_>, category: &Category) {
    let count = snapshot
        .products
        .iter()
        .filter(|product| product.category_id == category.id)
        .count();
    println!(
        "- [{}] {} ({} products) {}",
        category.id, category.name, count, category.description
    );
}

fn render_supplier(supplier: &Supplier) {
    println!("- [{}] {}", supplier.id, supplier.name);
    if !supplier.contact.is_empty() {
        println!("    Contact: {}", supplier.contact);
    }
    if !supplier.email.is_empty() {
        println!("    Email: {}", supplier.email);
    }
    if !supplier.phone.is_empty() {
        println!("    Phone: {}", supplier.phone);
    }
    if !supplier.address.is_empty() {
        println!("    Address: {}", supplier.address);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trend_days_accepts_the_configured_range() {
        assert_eq!(parse_trend_days("1"), Ok(1));
        assert_eq!(parse_trend_days("366"), Ok(366));
    }

    #[test]
    fn trend_days_outside_range_is_rejected() {
        for raw in ["0", "367", "200000000", "-3", "week"] {
            assert!(parse_trend_days(raw).is_err(), "{raw} should be rejected");
        }
    }

    #[test]
    fn trend_command_rejects_oversized_window() {
        let parsed = Cli::try_parse_from(["inventory", "reports", "trend", "--days", "200000000"]);
        assert!(parsed.is_err());
        let parsed = Cli::try_parse_from(["inventory", "reports", "trend", "--days", "30"]);
        assert!(parsed.is_ok());
    }
}
