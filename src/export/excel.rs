//! Excel生成
//!
//! - Comparison シート: 比較行と色分けした縦棒グラフ
//! - Products シート: 主製品と類似製品の生データ

use crate::error::Result;
use dropsight_common::comparison::comparison_label;
use dropsight_common::{AnalysisResponse, ComparisonRow, Product};
use rust_xlsxwriter::{
    Chart, ChartPoint, ChartSolidFill, ChartType, Color, Format, Workbook, Worksheet,
};
use std::path::Path;

pub const COMPARISON_SHEET: &str = "Comparison";
pub const PRODUCTS_SHEET: &str = "Products";

const COMPARISON_HEADERS: [&str; 4] = ["Label", "Product", "Success Probability (%)", "Color"];
const PRODUCT_HEADERS: [&str; 8] = [
    "Role",
    "Label",
    "Key",
    "Reviews",
    "Price",
    "Sales",
    "Probability",
    "Similarity",
];

pub fn generate_excel(response: &AnalysisResponse, output_path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();
    let percent = Format::new().set_num_format("0.0");
    let money = Format::new().set_num_format("#,##0.00");

    let rows = response.comparison_rows();

    let sheet = workbook.add_worksheet();
    write_comparison_sheet(sheet, &rows, &header, &percent)?;

    let sheet = workbook.add_worksheet();
    write_products_sheet(sheet, response, &header, &money)?;

    workbook.save(output_path)?;
    Ok(())
}

fn write_comparison_sheet(
    sheet: &mut Worksheet,
    rows: &[ComparisonRow],
    header: &Format,
    percent: &Format,
) -> Result<()> {
    sheet.set_name(COMPARISON_SHEET)?;

    for (col, title) in COMPARISON_HEADERS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *title, header)?;
    }

    for (i, row) in rows.iter().enumerate() {
        let r = i as u32 + 1;
        sheet.write_string(r, 0, row.label.as_str())?;
        sheet.write_string(r, 1, row.display_name.as_str())?;
        sheet.write_number_with_format(r, 2, row.probability_percent, percent)?;
        sheet.write_string(r, 3, row.color.hex())?;
    }

    sheet.set_column_width(0, 14)?;
    sheet.set_column_width(1, 24)?;
    sheet.set_column_width(2, 24)?;
    sheet.set_column_width(3, 10)?;

    let last = rows.len() as u32;
    let points: Vec<ChartPoint> = rows
        .iter()
        .map(|row| {
            ChartPoint::new().set_format(ChartSolidFill::new().set_color(Color::RGB(row.color.rgb())))
        })
        .collect();

    let mut chart = Chart::new(ChartType::Column);
    chart
        .add_series()
        .set_name("Success Probability")
        .set_categories((COMPARISON_SHEET, 1, 0, last, 0))
        .set_values((COMPARISON_SHEET, 1, 2, last, 2))
        .set_points(&points);
    chart.title().set_name("Success Probability Comparison");
    chart.legend().set_hidden();

    sheet.insert_chart(1, 5, &chart)?;
    Ok(())
}

fn write_products_sheet(
    sheet: &mut Worksheet,
    response: &AnalysisResponse,
    header: &Format,
    money: &Format,
) -> Result<()> {
    sheet.set_name(PRODUCTS_SHEET)?;

    for (col, title) in PRODUCT_HEADERS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *title, header)?;
    }

    write_product_row(sheet, 1, "primary", "My Product", &response.product, money)?;
    for (i, product) in response.result.similar_products.iter().enumerate() {
        let label = comparison_label(i);
        write_product_row(sheet, i as u32 + 2, "similar", &label, product, money)?;
    }

    sheet.set_column_width(2, 24)?;
    Ok(())
}

fn write_product_row(
    sheet: &mut Worksheet,
    row: u32,
    role: &str,
    label: &str,
    product: &Product,
    money: &Format,
) -> Result<()> {
    sheet.write_string(row, 0, role)?;
    sheet.write_string(row, 1, label)?;
    sheet.write_string(row, 2, product.key.as_str())?;
    sheet.write_number(row, 3, product.reviews as f64)?;
    sheet.write_number_with_format(row, 4, product.price, money)?;
    sheet.write_number(row, 5, product.sales as f64)?;
    // 主製品の類似度は表示しない
    if role != "primary" {
        if let Some(p) = product.probability {
            sheet.write_number(row, 6, p)?;
        }
        if let Some(s) = product.similarity {
            sheet.write_number(row, 7, s)?;
        }
    }
    Ok(())
}
