//! Sample catalog used to populate an empty store on startup.

use anyhow::Context;

use super::models::CreateBook;
use super::service::CatalogService;

fn book(
    title: &str,
    author: &str,
    publisher: &str,
    category: &str,
    description: &str,
    price: f64,
    cover: &str,
    publication_date: &str,
    isbn: &str,
    pages: i64,
) -> CreateBook {
    CreateBook {
        title: Some(title.to_string()),
        author: Some(author.to_string()),
        publisher: Some(publisher.to_string()),
        category: Some(category.to_string()),
        description: Some(description.to_string()),
        price: Some(price),
        cover: Some(cover.to_string()),
        publication_date: Some(publication_date.to_string()),
        isbn: Some(isbn.to_string()),
        pages: Some(pages),
    }
}

/// The demo catalog: five well-known titles.
pub fn sample_books() -> Vec<CreateBook> {
    vec![
        book(
            "三体",
            "刘慈欣",
            "重庆出版社",
            "科幻",
            "地球文明向宇宙发出的一声啼鸣，以及以此为开端，地球文明与三体文明间的恩怨情仇。",
            23.00,
            "https://img1.doubanio.com/view/subject/s/public/s2768378.jpg",
            "2008-01-01",
            "9787536692930",
            302,
        ),
        book(
            "百年孤独",
            "加西亚·马尔克斯",
            "南海出版公司",
            "魔幻现实主义",
            "讲述了布恩迪亚家族七代人的传奇故事，以及加勒比海沿岸小镇马孔多的百年兴衰。",
            39.50,
            "https://img2.doubanio.com/view/subject/s/public/s6384944.jpg",
            "2011-06-01",
            "9787544253994",
            360,
        ),
        book(
            "活着",
            "余华",
            "作家出版社",
            "当代文学",
            "讲述了农村人福贵悲惨的人生遭遇。福贵本是个阔少爷，可他嗜赌如命，终于赌光了家业。",
            20.00,
            "https://img9.doubanio.com/view/subject/s/public/s29053580.jpg",
            "2012-08-01",
            "9787506365437",
            191,
        ),
        book(
            "解忧杂货店",
            "东野圭吾",
            "南海出版公司",
            "治愈系小说",
            "在僻静的街道旁，有一家特别的杂货店，只要在晚上把写下烦恼的信投进店后门的牛奶箱，第二天就会在箱子里得到回答。",
            39.50,
            "https://img9.doubanio.com/view/subject/s/public/s27264181.jpg",
            "2014-05-01",
            "9787544270878",
            291,
        ),
        book(
            "人类简史",
            "尤瓦尔·赫拉利",
            "中信出版社",
            "历史",
            "十万年前，地球上至少有六种不同的人。但今日，只剩下了我们自己——智人。我们曾经只是非洲角落一个毫不起眼的族群，对地球上的生态系统也没有太大的影响力。",
            68.00,
            "https://img9.doubanio.com/view/subject/s/public/s27814883.jpg",
            "2014-11-01",
            "9787508647357",
            440,
        ),
    ]
}

/// Seed the catalog when it is empty. An already-populated store is left
/// untouched so repeated starts do not duplicate records.
pub async fn seed_catalog(service: &CatalogService) -> anyhow::Result<()> {
    let existing = service
        .total()
        .await
        .context("failed to inspect catalog before seeding")?;
    if existing > 0 {
        tracing::info!(count = existing, "catalog already populated, skipping seed");
        return Ok(());
    }

    let books = sample_books();
    let count = books.len();
    for book in books {
        service
            .create(book)
            .await
            .context("failed to seed catalog")?;
    }

    tracing::info!(count, "seeded sample catalog");
    Ok(())
}
