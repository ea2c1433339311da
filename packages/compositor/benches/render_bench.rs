use criterion::{black_box, criterion_group, criterion_main, Criterion};
use storefront_catalog::Product;
use storefront_compositor::{render_page, CatalogData, ComposeOptions, Host};
use storefront_schema::{GlobalStyles, Page, Section, SectionType};

const TYPES: [SectionType; 8] = [
    SectionType::AnnouncementBar,
    SectionType::Hero,
    SectionType::Text,
    SectionType::ProductGrid,
    SectionType::Testimonials,
    SectionType::Image,
    SectionType::Newsletter,
    SectionType::Footer,
];

fn large_page(sections: usize) -> Page {
    let mut page = Page::new("home", "Home", "/");
    page.sections = (0..sections)
        .map(|i| {
            let section_type = TYPES[i % TYPES.len()].clone();
            // reverse order so the sort has work to do
            Section::new(format!("section-{}", i), section_type, (sections - i) as f64)
        })
        .collect();
    page
}

fn catalog(products: usize) -> CatalogData {
    CatalogData::new("Bench Store").with_products(
        (0..products)
            .map(|i| Product::new(format!("p{}", i), format!("Product {}", i), 10.0 + i as f64))
            .collect(),
    )
}

fn render_large_page(c: &mut Criterion) {
    let page = large_page(200);
    let data = catalog(50);
    let global = GlobalStyles::default();
    let options = ComposeOptions::default();

    c.bench_function("render_storefront_200_sections", |b| {
        b.iter(|| render_page(black_box(&page), &data, &global, &options, &Host::Storefront))
    });

    c.bench_function("render_canvas_200_sections", |b| {
        let host = Host::canvas(Some("section-10"));
        b.iter(|| render_page(black_box(&page), &data, &global, &options, &host))
    });
}

fn render_to_html(c: &mut Criterion) {
    let page = large_page(50);
    let data = catalog(20);
    let tree = render_page(&page, &data, &GlobalStyles::default(), &ComposeOptions::default(), &Host::Storefront);

    c.bench_function("render_tree_to_html_50_sections", |b| b.iter(|| black_box(&tree).to_html()));
}

criterion_group!(benches, render_large_page, render_to_html);
criterion_main!(benches);
