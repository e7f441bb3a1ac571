//! Product catalog partitioned by category

use database::cassandra::CassandraContext;
use domain_products::{CassandraProductRepository, NewProduct, Product, ProductService};
use eyre::Result;

const LIST_CATEGORY: &str = "Electronics";
const SEARCH_TERM: &str = "Pro";
const STOCK_DECREASE: i32 = 5;

pub fn sample_products() -> Vec<NewProduct> {
    vec![
        NewProduct::new("Electronics", "Smartphone X1", 89_999)
            .with_description("High-end smartphone with amazing features")
            .with_stock(120)
            .with_attribute("Brand", "TechCorp")
            .with_attribute("Color", "Black")
            .with_attribute("Storage", "128GB")
            .with_attribute("RAM", "8GB"),
        NewProduct::new("Electronics", "Laptop Pro", 149_999)
            .with_description("Powerful laptop for professionals")
            .with_stock(50)
            .with_attribute("Brand", "TechCorp")
            .with_attribute("Processor", "Intel i7")
            .with_attribute("RAM", "16GB")
            .with_attribute("Storage", "512GB SSD")
            .with_attribute("Screen", "15.6 inch"),
        NewProduct::new("Books", "Cassandra: The Definitive Guide", 4_599)
            .with_description("Learn all about Cassandra database")
            .with_stock(200)
            .with_attribute("Author", "Jeff Carpenter")
            .with_attribute("Format", "Paperback")
            .with_attribute("Pages", "400"),
        NewProduct::new("Books", "Rust Programming Masterclass", 3_999)
            .with_description("Complete Rust programming guide")
            .with_stock(150)
            .with_attribute("Author", "John Smith")
            .with_attribute("Format", "Hardcover")
            .with_attribute("Pages", "550"),
        NewProduct::new("Home", "Smart Thermostat", 12_999)
            .with_description("Control your home temperature from your phone")
            .with_stock(75)
            .with_attribute("Brand", "HomeComfort")
            .with_attribute("Color", "White")
            .with_attribute("Wireless", "Yes")
            .with_attribute("App Available", "iOS, Android"),
    ]
}

pub fn format_product(product: &Product) -> String {
    format!(
        "{} - {} - ${} - Stock: {}",
        product.name,
        product.description,
        product.display_price(),
        product.stock_level
    )
}

/// `key: value` lines, sorted by key
pub fn format_attributes(product: &Product) -> Vec<String> {
    product
        .attributes
        .iter()
        .map(|(key, value)| format!("{}: {}", key, value))
        .collect()
}

pub async fn run(context: &CassandraContext) -> Result<()> {
    let repository = CassandraProductRepository::init(context.session()).await?;
    let service = ProductService::new(repository);

    println!("Populating sample products...");
    for input in sample_products() {
        let product = service.upsert_product(input).await?;
        println!("Added product: {} in category {}", product.name, product.category);
    }

    println!("\n--- Products in {} ---", LIST_CATEGORY);
    let listed = service.list_category(LIST_CATEGORY).await?;
    for product in &listed {
        println!("{}", format_product(product));
        println!("Attributes:");
        for line in format_attributes(product) {
            println!("  {}", line);
        }
        println!();
    }

    println!("--- Products matching '{}' ---", SEARCH_TERM);
    for product in service.search(SEARCH_TERM).await? {
        println!(
            "{} - {} - ${}",
            product.name,
            product.category,
            product.display_price()
        );
    }

    if let Some(product) = listed.first() {
        println!("\n--- Updating stock level for {} ---", product.name);
        println!("Old stock level: {}", product.stock_level);
        let updated = service.adjust_stock(product.id, -STOCK_DECREASE).await?;
        println!("New stock level: {}", updated.stock_level);
    }

    Ok(())
}
