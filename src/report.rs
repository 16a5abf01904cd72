//! 解析結果のテキストレポート

use dropsight_common::comparison::comparison_label;
use dropsight_common::{AnalysisResponse, ComparisonRow, Product};
use std::fmt::Write;

const BAR_WIDTH: usize = 20;

/// 成功確率・製品詳細・比較表・類似製品をまとめて描画
pub fn render(response: &AnalysisResponse) -> String {
    let rows = response.comparison_rows();
    let mut out = String::new();

    render_probability(&mut out, response.result.probability);
    out.push('\n');
    render_product(&mut out, &response.product);
    out.push('\n');
    render_comparison(&mut out, &rows);
    out.push('\n');
    render_similar(&mut out, &response.result.similar_products);

    out
}

/// `[████░░░░] 41.0%` 形式のバー
pub fn probability_bar(probability: f64) -> String {
    let clamped = probability.clamp(0.0, 1.0);
    let filled = (clamped * BAR_WIDTH as f64).round() as usize;
    format!(
        "[{}{}] {}",
        "█".repeat(filled),
        "░".repeat(BAR_WIDTH - filled),
        format_percent(probability * 100.0)
    )
}

pub fn format_percent(percent: f64) -> String {
    format!("{:.1}%", percent)
}

pub fn format_price(price: f64) -> String {
    format!("₹{:.2}", price)
}

fn render_probability(out: &mut String, probability: f64) {
    let _ = writeln!(out, "Success Probability");
    let _ = writeln!(out, "  {}", probability_bar(probability));
}

fn render_product(out: &mut String, product: &Product) {
    let _ = writeln!(out, "Product: {}", product.key);
    let _ = writeln!(out, "  Price:   {}", format_price(product.price));
    let _ = writeln!(out, "  Reviews: {}", product.reviews);
    let _ = writeln!(out, "  Sales:   {}", product.sales);
}

fn render_comparison(out: &mut String, rows: &[ComparisonRow]) {
    let label_width = rows.iter().map(|r| r.label.chars().count()).max().unwrap_or(0);
    let name_width = rows
        .iter()
        .map(|r| r.display_name.chars().count())
        .max()
        .unwrap_or(0);

    let _ = writeln!(out, "Success Probability Comparison");
    for row in rows {
        let _ = writeln!(
            out,
            "  {:<lw$}  {:<nw$}  {:>6}  {} {}",
            row.label,
            row.display_name,
            format_percent(row.probability_percent),
            row.color,
            row.color.hex(),
            lw = label_width,
            nw = name_width,
        );
    }
}

fn render_similar(out: &mut String, similar: &[Product]) {
    let _ = writeln!(out, "Similar Products");
    if similar.is_empty() {
        let _ = writeln!(out, "  (none)");
        return;
    }

    for (index, product) in similar.iter().enumerate() {
        let matched = product
            .similarity
            .map(|s| format!("{} match", format_percent(s * 100.0)))
            .unwrap_or_else(|| "n/a".to_string());
        let _ = writeln!(
            out,
            "  {} ({})  {} • {} reviews  {}",
            comparison_label(index),
            product.key,
            format_price(product.price),
            product.reviews,
            matched
        );
    }
}
