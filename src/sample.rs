/// Poster offered by the import dialog's "Load Sample HTML" button.
pub const SAMPLE_POSTER: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8" />
    <title>Sample Poster</title>
    <style>
        body { margin: 0; padding: 0; }
        .poster {
            width: 720px; height: 720px; position: relative;
            background: #f3f4f6; overflow: hidden; font-family: sans-serif;
        }
        .title {
            position: absolute; top: 80px; left: 40px;
            font-size: 48px; font-weight: bold; color: #111827;
        }
        .subtitle {
            position: absolute; top: 160px; left: 40px;
            font-size: 20px; color: #374151;
        }
        .hero {
            position: absolute; bottom: 0; right: 0; width: 380px; height: 380px;
            object-fit: cover; border-top-left-radius: 16px;
        }
    </style>
</head>
<body>
    <div class="poster">
        <h1 class="title">Summer Sale</h1>
        <p class="subtitle">Up to <strong>50% off</strong> on select items!</p>
        <img class="hero"
             src="https://images.unsplash.com/photo-1520975922284-7bcd4290b0e1?q=80&w=1200&auto=format&fit=crop"
             alt="Model" />
    </div>
</body>
</html>"#;
