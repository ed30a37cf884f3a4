/// 單頁上傳介面：以 FileReader 讀成 data URL 後送到 `/api/submit`
pub const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Routing Input Transformer</title>
<style>
  body { background-color: #f5f5f5; padding: 20px; font-family: sans-serif; color: #333333; }
  h1, h2 { text-align: center; color: #333333; }
  .card { background: #ffffff; border-radius: 5px; padding: 10px 20px; margin-bottom: 20px; }
  #upload-data {
    width: 100%; height: 60px; line-height: 60px; border: 1px dashed #999999;
    border-radius: 5px; text-align: center; margin: 10px 0; cursor: pointer;
  }
  #upload-data.dragging { background: #eef4ff; }
  #output-table-container { overflow-x: auto; margin-top: 20px; }
  .output-table { border-collapse: collapse; }
  .output-table th, .output-table td { border: 1px solid #dddddd; padding: 4px 8px; text-align: left; }
  #loading-output { min-height: 1.2em; margin: 10px; }
  .error { color: #b00020; }
</style>
</head>
<body>
<div class="card">
  <h1>Routing Input Transformer</h1>
  <h2>Upload File</h2>
  <div id="upload-data">Drag and Drop or <a href="#" id="select-files">Select Files</a></div>
  <input type="file" id="file-input" accept=".csv,.xls,.xlsx" hidden>
  <button id="submit-button" style="margin: 10px">Submit</button>
  <div id="loading-output"></div>
</div>
<div id="file-info" style="margin-top: 20px"></div>
<div id="output-table-container"></div>
<div class="card">
  <h2>Download Transformed File</h2>
  <a id="download-link" download="data.xlsx" href="" style="margin: 10px">Download</a>
</div>
<script>
  let upload = { filename: null, contents: null };
  const dropZone = document.getElementById('upload-data');
  const fileInput = document.getElementById('file-input');

  function readFile(file) {
    const reader = new FileReader();
    reader.onload = () => {
      upload = { filename: file.name, contents: reader.result };
      dropZone.firstChild.textContent = file.name + ' - ';
    };
    reader.readAsDataURL(file);
  }

  document.getElementById('select-files').addEventListener('click', (e) => {
    e.preventDefault();
    fileInput.click();
  });
  fileInput.addEventListener('change', () => {
    if (fileInput.files.length > 0) readFile(fileInput.files[0]);
  });
  dropZone.addEventListener('dragover', (e) => { e.preventDefault(); dropZone.classList.add('dragging'); });
  dropZone.addEventListener('dragleave', () => dropZone.classList.remove('dragging'));
  dropZone.addEventListener('drop', (e) => {
    e.preventDefault();
    dropZone.classList.remove('dragging');
    if (e.dataTransfer.files.length > 0) readFile(e.dataTransfer.files[0]);
  });

  document.getElementById('submit-button').addEventListener('click', async () => {
    const loading = document.getElementById('loading-output');
    const info = document.getElementById('file-info');
    const container = document.getElementById('output-table-container');
    const link = document.getElementById('download-link');

    loading.textContent = 'Processing...';
    try {
      const response = await fetch('/api/submit', {
        method: 'POST',
        headers: { 'Content-Type': 'application/json' },
        body: JSON.stringify(upload),
      });
      const result = await response.json();
      loading.textContent = '';

      if (!response.ok) {
        link.setAttribute('href', '');
        info.textContent = '';
        container.innerHTML = '';
        loading.innerHTML = '<span class="error"></span>';
        loading.firstChild.textContent = result.error;
        return;
      }

      switch (result.status) {
        case 'processed':
          info.textContent = result.file_info;
          container.innerHTML = result.table_html;
          link.setAttribute('href', result.download_href);
          break;
        case 'rejected':
          link.setAttribute('href', '');
          info.textContent = '';
          container.innerHTML = '';
          loading.textContent = result.message;
          break;
        default:
          link.setAttribute('href', '');
          info.textContent = '';
          container.innerHTML = '';
      }
    } catch (err) {
      link.setAttribute('href', '');
      loading.textContent = 'Request failed: ' + err;
    }
  });
</script>
</body>
</html>
"##;
