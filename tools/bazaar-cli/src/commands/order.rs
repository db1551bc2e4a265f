//! Order back-office commands.

use anyhow::Result;
use bazaar_commerce::checkout::{Order, OrderStatus};
use bazaar_commerce::ids::OrderId;
use bazaar_core::OrderQuery;
use dialoguer::Confirm;

use super::{OrderArgs, OrderCommand};
use crate::context::Context;
use crate::output::{format_timestamp, status_badge, truncate};

/// Run the order command.
pub async fn run(args: OrderArgs, ctx: &Context) -> Result<()> {
    let shop = ctx.storefront().await?;
    let operator = ctx.operator();

    match args.command {
        OrderCommand::List {
            status,
            search,
            page,
        } => {
            let query = OrderQuery {
                status: status.as_deref().map(str::parse::<OrderStatus>).transpose()?,
                search,
                page,
                ..Default::default()
            };
            let orders = shop.orders.list_orders(&operator, &query).await?;
            if ctx.output.is_json() {
                ctx.output.json(&orders);
                return Ok(());
            }
            if orders.is_empty() {
                ctx.output.info("No orders match");
                return Ok(());
            }

            let widths = [24, 22, 20, 12, 10];
            ctx.output.header(&format!(
                "Orders (page {} of {})",
                orders.pagination.page, orders.pagination.total_pages
            ));
            ctx.output
                .table_row(&["ID", "NUMBER", "CUSTOMER", "TOTAL", "STATUS"], &widths);
            for order in &orders.items {
                let customer = truncate(&order.shipping_address.full_name, 20);
                let total = order.total.display();
                let status = status_badge(order.status);
                ctx.output.table_row(
                    &[order.id.as_str(), &order.order_number, &customer, &total, &status],
                    &widths,
                );
            }
        }
        OrderCommand::Show { id } => {
            let order = shop.orders.get_order(&operator, &OrderId::new(id)).await?;
            if ctx.output.is_json() {
                ctx.output.json(&order);
            } else {
                print_order(ctx, &order);
            }
        }
        OrderCommand::Status { id, status, yes } => {
            let id = OrderId::new(id);
            let status: OrderStatus = status.parse()?;
            if status == OrderStatus::Canceled && !yes {
                let confirmed = Confirm::new()
                    .with_prompt(format!("Cancel order {}?", id))
                    .default(false)
                    .interact()?;
                if !confirmed {
                    ctx.output.info("Aborted");
                    return Ok(());
                }
            }

            let order = shop.orders.update_status(&operator, &id, status).await?;
            if ctx.output.is_json() {
                ctx.output.json(&order);
            } else {
                ctx.output.success(&format!(
                    "{} is now {}",
                    order.order_number,
                    status_badge(order.status)
                ));
            }
        }
    }

    Ok(())
}

fn print_order(ctx: &Context, order: &Order) {
    ctx.output.header(&order.order_number);
    ctx.output.kv("id", order.id.as_str());
    ctx.output.kv("status", &status_badge(order.status));
    ctx.output.kv("customer", order.user_id.as_str());
    ctx.output.kv("placed", &format_timestamp(order.created_at));
    if let Some(canceled_at) = order.canceled_at {
        ctx.output.kv("canceled", &format_timestamp(canceled_at));
    }
    ctx.output.kv("ship to", &order.shipping_address.one_line());
    ctx.output.kv("payment", &order.payment.payment_id);
    ctx.output.kv("gateway order", &order.payment.gateway_order_id);

    ctx.output.info("Items:");
    for line in &order.line_items {
        ctx.output.list_item(&format!(
            "{} x {} @ {} = {}",
            line.quantity,
            line.name,
            line.unit_price.display(),
            line.line_total.display()
        ));
    }
    ctx.output.kv("total", &order.total.display());
}
